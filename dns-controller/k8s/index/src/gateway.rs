use crate::routes::RouteKind;
use dns_controller_core::RecordMeta;
use dns_controller_k8s_api::{
    annotations,
    gateway::{self, FromNamespaces, Gateway, GatewayListeners},
    labels::InvalidSelector,
    Selector,
};
use std::fmt;

/// A gateway reduced to what the resolver needs.
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayBinding {
    pub namespace: String,
    pub name: String,
    pub listeners: Vec<ListenerBinding>,
    /// Target annotation values if set, else the status addresses.
    pub targets: Vec<String>,
    pub meta: RecordMeta,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListenerBinding {
    pub name: String,
    pub hostname: Option<String>,
    pub port: u16,
    pub protocol: Protocol,
    pub namespaces: AllowedNamespaces,
    /// Route kinds the listener restricts itself to, if any.
    pub kinds: Option<Vec<RouteKind>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
    Tls,
    Tcp,
    Udp,
    Other(String),
}

/// Which namespaces may attach routes to a listener.
#[derive(Clone, Debug, PartialEq)]
pub enum AllowedNamespaces {
    All,
    Same,
    Selector(Selector),
}

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidGateway {
    #[error("Gateway resource must have a name")]
    MissingName,

    #[error("Gateway {0} must have a namespace")]
    MissingNamespace(String),

    #[error(
        "listener {listener} of Gateway {namespace}/{name} selects namespaces without a selector"
    )]
    MissingSelector {
        namespace: String,
        name: String,
        listener: String,
    },

    #[error(
        "listener {listener} of Gateway {namespace}/{name} has an invalid namespace selector: \
         {source}"
    )]
    InvalidSelector {
        namespace: String,
        name: String,
        listener: String,
        #[source]
        source: InvalidSelector,
    },

    #[error("listener {listener} of Gateway {namespace}/{name} has invalid port {port}")]
    InvalidPort {
        namespace: String,
        name: String,
        listener: String,
        port: i64,
    },
}

// === impl GatewayBinding ===

impl TryFrom<&Gateway> for GatewayBinding {
    type Error = InvalidGateway;

    fn try_from(gateway: &Gateway) -> Result<Self, Self::Error> {
        let name = gateway
            .metadata
            .name
            .clone()
            .ok_or(InvalidGateway::MissingName)?;
        let namespace = gateway
            .metadata
            .namespace
            .clone()
            .ok_or_else(|| InvalidGateway::MissingNamespace(name.clone()))?;

        let listeners = gateway
            .spec
            .listeners
            .iter()
            .map(|listener| {
                ListenerBinding::from_listener(listener).map_err(|error| match error {
                    ListenerError::MissingSelector => InvalidGateway::MissingSelector {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        listener: listener.name.clone(),
                    },
                    ListenerError::InvalidSelector(source) => InvalidGateway::InvalidSelector {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        listener: listener.name.clone(),
                        source,
                    },
                    ListenerError::InvalidPort(port) => InvalidGateway::InvalidPort {
                        namespace: namespace.clone(),
                        name: name.clone(),
                        listener: listener.name.clone(),
                        port,
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let empty = annotations::Annotations::new();
        let annots = gateway.metadata.annotations.as_ref().unwrap_or(&empty);
        let mut targets = annotations::targets(annots);
        if targets.is_empty() {
            targets = gateway
                .status
                .iter()
                .flat_map(|status| status.addresses.iter().flatten())
                .map(|addr| addr.value.clone())
                .collect();
        }

        let meta = annotations::record_meta(annots, &format!("gateway/{namespace}/{name}"));

        Ok(Self {
            namespace,
            name,
            listeners,
            targets,
            meta,
        })
    }
}

// === impl ListenerBinding ===

enum ListenerError {
    MissingSelector,
    InvalidSelector(InvalidSelector),
    InvalidPort(i64),
}

impl ListenerBinding {
    fn from_listener(listener: &GatewayListeners) -> Result<Self, ListenerError> {
        let allowed = listener.allowed_routes.as_ref();
        let namespaces = match allowed.and_then(|ar| ar.namespaces.as_ref()) {
            None => AllowedNamespaces::Same,
            Some(ns) => match ns.from.as_ref() {
                Some(FromNamespaces::All) => AllowedNamespaces::All,
                None | Some(FromNamespaces::Same) => AllowedNamespaces::Same,
                Some(FromNamespaces::Selector) => {
                    let selector = ns.selector.as_ref().ok_or(ListenerError::MissingSelector)?;
                    let selector = Selector::try_from(&gateway::namespace_selector(selector))
                        .map_err(ListenerError::InvalidSelector)?;
                    AllowedNamespaces::Selector(selector)
                }
            },
        };

        let port = i64::from(listener.port);
        let port = u16::try_from(port).map_err(|_| ListenerError::InvalidPort(port))?;

        let kinds = allowed.and_then(|ar| ar.kinds.as_ref()).and_then(|kinds| {
            if kinds.is_empty() {
                return None;
            }
            Some(
                kinds
                    .iter()
                    .filter(|k| k.group.as_deref().unwrap_or(gateway::GROUP) == gateway::GROUP)
                    .filter_map(|k| RouteKind::from_kind(&k.kind))
                    .collect(),
            )
        });

        Ok(Self {
            name: listener.name.clone(),
            hostname: listener.hostname.clone().filter(|h| !h.is_empty()),
            port,
            protocol: Protocol::from(listener.protocol.as_str()),
            namespaces,
            kinds,
        })
    }

    /// Whether routes of `kind` may attach to this listener.
    pub fn accepts_kind(&self, kind: RouteKind) -> bool {
        if !self.protocol.carries(kind) {
            return false;
        }
        match &self.kinds {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

// === impl Protocol ===

impl Protocol {
    /// Whether a listener speaking this protocol serves routes of `kind`.
    /// HTTPS is served like HTTP.
    pub fn carries(&self, kind: RouteKind) -> bool {
        match self {
            Self::Http | Self::Https => matches!(kind, RouteKind::Http | RouteKind::Grpc),
            Self::Tls => kind == RouteKind::Tls,
            Self::Tcp => kind == RouteKind::Tcp,
            Self::Udp => kind == RouteKind::Udp,
            Self::Other(_) => false,
        }
    }
}

impl From<&str> for Protocol {
    fn from(protocol: &str) -> Self {
        match protocol {
            "HTTP" => Self::Http,
            "HTTPS" => Self::Https,
            "TLS" => Self::Tls,
            "TCP" => Self::Tcp,
            "UDP" => Self::Udp,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
            Self::Tls => "TLS",
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
            Self::Other(other) => other.as_str(),
        })
    }
}

impl fmt::Display for AllowedNamespaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "All",
            Self::Same => "Same",
            Self::Selector(_) => "Selector",
        })
    }
}
