//! Decides whether a route is bound to a gateway listener.
//!
//! Each (gateway, listener, route) triple advances through
//! [`AdmissionState`]s. A route that stops short of `Accepted` is not bound to
//! the listener; the [`Rejection`] names the rule it failed.

use crate::{
    gateway::{AllowedNamespaces, GatewayBinding, ListenerBinding},
    namespace::NamespaceIndex,
    routes::{Acceptance, ParentRef, RouteBinding},
};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdmissionState {
    Unmatched,
    ParentRefResolved,
    NamespaceAllowed,
    Accepted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No parent reference names the gateway.
    NoParentRef,
    /// Parent references name the gateway but select other listeners.
    ListenerNotSelected,
    /// The listener's protocol or allowed kinds exclude the route's kind.
    KindNotAllowed,
    /// The listener does not admit routes from the route's namespace.
    NamespaceNotAllowed { policy: String },
    /// The listener selects namespaces by label, and the route's namespace is
    /// not known.
    NamespaceNotFound,
    /// The gateway has not reported an `Accepted` condition for the route.
    NotAccepted,
    /// The gateway reported `Accepted: False`.
    Rejected,
    /// The `Accepted` condition was observed at an older generation.
    StaleGeneration { observed: i64, current: i64 },
}

/// The outcome of evaluating one (gateway, listener, route) triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Admission {
    pub state: AdmissionState,
    pub rejection: Option<Rejection>,
}

// === impl Admission ===

impl Admission {
    fn rejected(state: AdmissionState, rejection: Rejection) -> Self {
        Self {
            state,
            rejection: Some(rejection),
        }
    }

    fn accepted() -> Self {
        Self {
            state: AdmissionState::Accepted,
            rejection: None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.state == AdmissionState::Accepted
    }
}

/// Evaluates whether `route` is bound to `listener` of `gateway`.
pub fn admit(
    gateway: &GatewayBinding,
    listener: &ListenerBinding,
    route: &RouteBinding,
    namespaces: &NamespaceIndex,
) -> Admission {
    // Unmatched -> ParentRefResolved
    let mut names_gateway = false;
    let parents = route
        .parents
        .iter()
        .filter(|p| p.selects_gateway(&gateway.namespace, &gateway.name))
        .inspect(|_| names_gateway = true)
        .filter(|p| selects_listener(p, listener))
        .collect::<Vec<_>>();
    if parents.is_empty() {
        let rejection = if names_gateway {
            Rejection::ListenerNotSelected
        } else {
            Rejection::NoParentRef
        };
        return Admission::rejected(AdmissionState::Unmatched, rejection);
    }
    if !listener.accepts_kind(route.kind) {
        return Admission::rejected(AdmissionState::Unmatched, Rejection::KindNotAllowed);
    }

    // ParentRefResolved -> NamespaceAllowed
    let allowed = match &listener.namespaces {
        AllowedNamespaces::All => Ok(()),
        AllowedNamespaces::Same if route.namespace == gateway.namespace => Ok(()),
        AllowedNamespaces::Same => Err(Rejection::NamespaceNotAllowed {
            policy: listener.namespaces.to_string(),
        }),
        AllowedNamespaces::Selector(selector) => match namespaces.get(&route.namespace) {
            Some(labels) if selector.matches(labels) => Ok(()),
            Some(_) => Err(Rejection::NamespaceNotAllowed {
                policy: listener.namespaces.to_string(),
            }),
            None => Err(Rejection::NamespaceNotFound),
        },
    };
    if let Err(rejection) = allowed {
        return Admission::rejected(AdmissionState::ParentRefResolved, rejection);
    }

    // NamespaceAllowed -> Accepted
    let mut rejection = Rejection::NotAccepted;
    for parent in parents {
        match route.accepted_by(parent) {
            Acceptance::Accepted => return Admission::accepted(),
            Acceptance::Missing => {}
            Acceptance::Rejected => rejection = Rejection::Rejected,
            Acceptance::Stale { observed } => {
                rejection = Rejection::StaleGeneration {
                    observed,
                    current: route.generation,
                }
            }
        }
    }
    Admission::rejected(AdmissionState::NamespaceAllowed, rejection)
}

fn selects_listener(parent: &ParentRef, listener: &ListenerBinding) -> bool {
    if parent
        .section_name
        .as_deref()
        .is_some_and(|section| section != listener.name)
    {
        return false;
    }
    !parent.port.is_some_and(|port| port != listener.port)
}

impl fmt::Display for AdmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unmatched => "Unmatched",
            Self::ParentRefResolved => "ParentRefResolved",
            Self::NamespaceAllowed => "NamespaceAllowed",
            Self::Accepted => "Accepted",
        })
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParentRef => f.write_str("no parent reference to the gateway"),
            Self::ListenerNotSelected => {
                f.write_str("parent references select a different section or port")
            }
            Self::KindNotAllowed => f.write_str("listener does not allow the route kind"),
            Self::NamespaceNotAllowed { policy } => {
                write!(f, "route namespace not allowed by policy {policy}")
            }
            Self::NamespaceNotFound => f.write_str("route namespace not found"),
            Self::NotAccepted => f.write_str("route not accepted by the gateway"),
            Self::Rejected => f.write_str("route rejected by the gateway"),
            Self::StaleGeneration { observed, current } => write!(
                f,
                "route accepted at generation {observed} but is at generation {current}"
            ),
        }
    }
}
