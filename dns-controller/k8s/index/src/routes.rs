use dns_controller_k8s_api::{
    annotations,
    gateway::{self, GRPCRoute, HTTPRoute, TCPRoute, TLSRoute, UDPRoute},
    ObjectMeta,
};
use dns_controller_core::RecordMeta;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Http,
    Grpc,
    Tls,
    Tcp,
    Udp,
}

/// Maps a route resource's native schema onto the fields needed to bind it
/// to gateway listeners.
///
/// Each route kind has its own generated parent reference and status types,
/// so references are read through [`ParentRefFields`].
pub trait RouteAdapter {
    const KIND: RouteKind;

    fn metadata(&self) -> &ObjectMeta;

    /// Hostnames requested in the route's spec.
    fn hostnames(&self) -> &[String];

    fn parent_refs(&self) -> Vec<ParentRefFields<'_>>;

    /// The parent references and conditions in the route's status.
    fn parent_statuses(&self) -> Vec<(ParentRefFields<'_>, &[gateway::Condition])>;
}

/// A parent reference as written in a route, before defaulting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParentRefFields<'r> {
    pub group: Option<&'r str>,
    pub kind: Option<&'r str>,
    pub namespace: Option<&'r str>,
    pub name: &'r str,
    pub section_name: Option<&'r str>,
    pub port: Option<i64>,
}

/// Any supported route resource.
#[derive(Clone, Debug)]
pub enum RouteResource {
    Http(HTTPRoute),
    Grpc(GRPCRoute),
    Tls(TLSRoute),
    Tcp(TCPRoute),
    Udp(UDPRoute),
}

/// A route reduced to what the resolver needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteBinding {
    pub kind: RouteKind,
    pub namespace: String,
    pub name: String,
    pub generation: i64,
    /// Spec hostnames followed by any annotation hostnames.
    pub hostnames: Vec<String>,
    pub parents: Vec<ParentRef>,
    pub statuses: Vec<Status>,
    pub meta: RecordMeta,
}

/// A reference from a route to a Gateway, with the namespace defaulted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParentRef {
    pub namespace: String,
    pub name: String,
    pub section_name: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub parent: ParentRef,
    pub conditions: Vec<Condition>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    pub type_: ConditionType,
    pub status: bool,
    pub observed_generation: i64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConditionType {
    Accepted,
}

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidRoute {
    #[error("{0} resource must have a name")]
    MissingName(RouteKind),

    #[error("{kind} {name} must have a namespace")]
    MissingNamespace { kind: RouteKind, name: String },

    #[error("{kind} {namespace}/{name} references a parent Gateway without a name")]
    EmptyParentName {
        kind: RouteKind,
        namespace: String,
        name: String,
    },

    #[error("{kind} {namespace}/{name} references parent Gateway {parent} on invalid port {port}")]
    InvalidParentPort {
        kind: RouteKind,
        namespace: String,
        name: String,
        parent: String,
        port: i64,
    },
}

// === impl RouteKind ===

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "HTTPRoute",
            Self::Grpc => "GRPCRoute",
            Self::Tls => "TLSRoute",
            Self::Tcp => "TCPRoute",
            Self::Udp => "UDPRoute",
        }
    }

    pub(crate) fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "HTTPRoute" => Some(Self::Http),
            "GRPCRoute" => Some(Self::Grpc),
            "TLSRoute" => Some(Self::Tls),
            "TCPRoute" => Some(Self::Tcp),
            "UDPRoute" => Some(Self::Udp),
            _ => None,
        }
    }

    /// The kind name used in resource labels, e.g. `httproute`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Http => "httproute",
            Self::Grpc => "grpcroute",
            Self::Tls => "tlsroute",
            Self::Tcp => "tcproute",
            Self::Udp => "udproute",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === impl RouteAdapter ===

macro_rules! parent_ref_fields {
    ($parent_ref:expr) => {
        ParentRefFields {
            group: $parent_ref.group.as_deref(),
            kind: $parent_ref.kind.as_deref(),
            namespace: $parent_ref.namespace.as_deref(),
            name: $parent_ref.name.as_str(),
            section_name: $parent_ref.section_name.as_deref(),
            port: $parent_ref.port.map(i64::from),
        }
    };
}

macro_rules! route_adapter {
    ($route:ty, $kind:expr, |$this:ident| $hostnames:expr) => {
        impl RouteAdapter for $route {
            const KIND: RouteKind = $kind;

            fn metadata(&self) -> &ObjectMeta {
                &self.metadata
            }

            fn hostnames(&self) -> &[String] {
                let $this = self;
                $hostnames
            }

            fn parent_refs(&self) -> Vec<ParentRefFields<'_>> {
                self.spec
                    .parent_refs
                    .iter()
                    .flatten()
                    .map(|parent_ref| parent_ref_fields!(parent_ref))
                    .collect()
            }

            fn parent_statuses(&self) -> Vec<(ParentRefFields<'_>, &[gateway::Condition])> {
                self.status
                    .iter()
                    .flat_map(|status| status.parents.iter())
                    .map(|parent| {
                        let conditions = parent.conditions.as_deref().unwrap_or_default();
                        (parent_ref_fields!(parent.parent_ref), conditions)
                    })
                    .collect()
            }
        }
    };
    ($route:ty, $kind:expr, without_hostnames) => {
        route_adapter!($route, $kind, |_route| &[]);
    };
    ($route:ty, $kind:expr) => {
        route_adapter!($route, $kind, |route| route
            .spec
            .hostnames
            .as_deref()
            .unwrap_or_default());
    };
}

route_adapter!(HTTPRoute, RouteKind::Http);
route_adapter!(GRPCRoute, RouteKind::Grpc);
route_adapter!(TLSRoute, RouteKind::Tls);
route_adapter!(TCPRoute, RouteKind::Tcp, without_hostnames);
route_adapter!(UDPRoute, RouteKind::Udp, without_hostnames);

// === impl RouteResource ===

impl RouteResource {
    pub fn kind(&self) -> RouteKind {
        match self {
            Self::Http(_) => RouteKind::Http,
            Self::Grpc(_) => RouteKind::Grpc,
            Self::Tls(_) => RouteKind::Tls,
            Self::Tcp(_) => RouteKind::Tcp,
            Self::Udp(_) => RouteKind::Udp,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Self::Http(r) => r.metadata(),
            Self::Grpc(r) => r.metadata(),
            Self::Tls(r) => r.metadata(),
            Self::Tcp(r) => r.metadata(),
            Self::Udp(r) => r.metadata(),
        }
    }

    pub fn binding(&self, hostname_annotation: bool) -> Result<RouteBinding, InvalidRoute> {
        match self {
            Self::Http(r) => RouteBinding::from_adapter(r, hostname_annotation),
            Self::Grpc(r) => RouteBinding::from_adapter(r, hostname_annotation),
            Self::Tls(r) => RouteBinding::from_adapter(r, hostname_annotation),
            Self::Tcp(r) => RouteBinding::from_adapter(r, hostname_annotation),
            Self::Udp(r) => RouteBinding::from_adapter(r, hostname_annotation),
        }
    }
}

impl From<HTTPRoute> for RouteResource {
    fn from(route: HTTPRoute) -> Self {
        Self::Http(route)
    }
}

impl From<GRPCRoute> for RouteResource {
    fn from(route: GRPCRoute) -> Self {
        Self::Grpc(route)
    }
}

impl From<TLSRoute> for RouteResource {
    fn from(route: TLSRoute) -> Self {
        Self::Tls(route)
    }
}

impl From<TCPRoute> for RouteResource {
    fn from(route: TCPRoute) -> Self {
        Self::Tcp(route)
    }
}

impl From<UDPRoute> for RouteResource {
    fn from(route: UDPRoute) -> Self {
        Self::Udp(route)
    }
}

// === impl RouteBinding ===

impl RouteBinding {
    /// Builds a binding from a route resource.
    ///
    /// When `hostname_annotation` is set, hostnames listed in the route's
    /// hostname annotation are appended to its spec hostnames.
    pub fn from_adapter<R: RouteAdapter>(
        route: &R,
        hostname_annotation: bool,
    ) -> Result<Self, InvalidRoute> {
        let kind = R::KIND;
        let metadata = route.metadata();
        let name = metadata
            .name
            .clone()
            .ok_or(InvalidRoute::MissingName(kind))?;
        let namespace = metadata
            .namespace
            .clone()
            .ok_or_else(|| InvalidRoute::MissingNamespace {
                kind,
                name: name.clone(),
            })?;

        let mut parents = Vec::new();
        for parent_ref in route.parent_refs() {
            if !parent_ref.targets_gateway() {
                continue;
            }
            if parent_ref.name.is_empty() {
                return Err(InvalidRoute::EmptyParentName {
                    kind,
                    namespace,
                    name,
                });
            }
            let parent = ParentRef::resolve(&namespace, &parent_ref).map_err(|port| {
                InvalidRoute::InvalidParentPort {
                    kind,
                    namespace: namespace.clone(),
                    name: name.clone(),
                    parent: parent_ref.name.to_string(),
                    port,
                }
            })?;
            parents.push(parent);
        }

        let statuses = Status::collect(&namespace, route.parent_statuses());

        let empty = annotations::Annotations::new();
        let annotations = metadata.annotations.as_ref().unwrap_or(&empty);
        let mut hostnames = route.hostnames().to_vec();
        if hostname_annotation {
            hostnames.extend(annotations::hostnames(annotations));
        }

        let resource = format!("{}/{}/{}", kind.label(), namespace, name);
        let meta = annotations::record_meta(annotations, &resource);

        Ok(Self {
            kind,
            generation: metadata.generation.unwrap_or(0),
            namespace,
            name,
            hostnames,
            parents,
            statuses,
            meta,
        })
    }

    /// Identifies the route in endpoint labels as `<kind>/<namespace>/<name>`.
    pub fn resource(&self) -> String {
        format!("{}/{}/{}", self.kind.label(), self.namespace, self.name)
    }

    /// Whether the route's status carries a true `Accepted` condition for
    /// `parent` at the route's current generation.
    pub fn accepted_by(&self, parent: &ParentRef) -> Acceptance {
        let mut acceptance = Acceptance::Missing;
        for status in self.statuses.iter().filter(|s| s.parent == *parent) {
            for condition in &status.conditions {
                if condition.type_ != ConditionType::Accepted {
                    continue;
                }
                if !condition.status {
                    acceptance = Acceptance::Rejected;
                    continue;
                }
                if condition.observed_generation != self.generation {
                    acceptance = Acceptance::Stale {
                        observed: condition.observed_generation,
                    };
                    continue;
                }
                return Acceptance::Accepted;
            }
        }
        acceptance
    }
}

/// The outcome of looking up a parent's `Accepted` condition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Acceptance {
    Accepted,
    Missing,
    Rejected,
    Stale { observed: i64 },
}

// === impl ParentRefFields ===

impl ParentRefFields<'_> {
    pub fn targets_gateway(&self) -> bool {
        gateway::targets_gateway(self.group, self.kind)
    }
}

// === impl ParentRef ===

impl ParentRef {
    /// Resolves a parent reference against the route's namespace.
    ///
    /// Fails with the port when it does not fit a listener port.
    fn resolve(route_ns: &str, parent_ref: &ParentRefFields<'_>) -> Result<Self, i64> {
        let ParentRefFields {
            group: _,
            kind: _,
            namespace,
            name,
            section_name,
            port,
        } = *parent_ref;
        let port = port
            .map(|port| u16::try_from(port).map_err(|_| port))
            .transpose()?;
        Ok(Self {
            namespace: namespace.unwrap_or(route_ns).to_string(),
            name: name.to_string(),
            section_name: section_name.map(Into::into),
            port,
        })
    }

    pub fn selects_gateway(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)?;
        if let Some(section) = &self.section_name {
            write!(f, "#{section}")?;
        }
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

// === impl Status ===

impl Status {
    fn collect(
        route_ns: &str,
        parents: Vec<(ParentRefFields<'_>, &[gateway::Condition])>,
    ) -> Vec<Self> {
        parents
            .into_iter()
            .filter(|(parent_ref, _)| parent_ref.targets_gateway())
            .filter_map(|(parent_ref, conditions)| {
                let parent = ParentRef::resolve(route_ns, &parent_ref).ok()?;
                Some(Self::from_conditions(parent, conditions))
            })
            .collect()
    }

    fn from_conditions(parent: ParentRef, conditions: &[gateway::Condition]) -> Self {
        let conditions = conditions
            .iter()
            .filter_map(|condition| {
                let type_ = match condition.type_.as_str() {
                    gateway::ACCEPTED => ConditionType::Accepted,
                    _ => return None,
                };
                let status = match condition.status.as_str() {
                    "True" => true,
                    "False" | "Unknown" => false,
                    condition_status => {
                        tracing::warn!(
                            %parent,
                            %type_,
                            %condition_status,
                            "Unexpected condition status found in parent status"
                        );
                        return None;
                    }
                };
                Some(Condition {
                    type_,
                    status,
                    observed_generation: condition.observed_generation.unwrap_or(0),
                })
            })
            .collect();

        Self { parent, conditions }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "Accepted"),
        }
    }
}
