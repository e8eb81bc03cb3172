use crate::{
    admission::admit,
    gateway::{GatewayBinding, InvalidGateway},
    namespace::NamespaceIndex,
    routes::{InvalidRoute, RouteResource},
};
use dns_controller_core::{group, intersect, merge, Endpoint, RESOURCE_LABEL_KEY};
use dns_controller_k8s_api::{annotations, gateway::Gateway, Labels, Namespace, Selector};
use tracing::debug;

/// The controller name resources are matched against when they carry a
/// controller annotation.
pub const DEFAULT_CONTROLLER: &str = "dns-controller";

/// Computes the endpoints implied by gateways and the routes bound to them.
#[derive(Clone, Debug)]
pub struct Resolver {
    controller: String,
    hostname_annotation: bool,
    /// Only gateways in this namespace are read.
    gateway_namespace: Option<String>,
    /// Only routes in this namespace are read.
    namespace: Option<String>,
    gateway_label_filter: Option<Selector>,
    label_filter: Option<Selector>,
    /// Matched against route annotations.
    annotation_filter: Option<Selector>,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Gateway(#[from] InvalidGateway),

    #[error(transparent)]
    Route(#[from] InvalidRoute),
}

/// Resolves with the default controller name, honoring hostname annotations.
pub fn resolve(
    gateways: &[Gateway],
    routes: &[RouteResource],
    namespaces: &[Namespace],
) -> Result<Vec<Endpoint>, ResolveError> {
    Resolver::default().resolve(gateways, routes, namespaces)
}

// === impl Resolver ===

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROLLER, true)
    }
}

impl Resolver {
    pub fn new(controller: impl Into<String>, hostname_annotation: bool) -> Self {
        Self {
            controller: controller.into(),
            hostname_annotation,
            gateway_namespace: None,
            namespace: None,
            gateway_label_filter: None,
            label_filter: None,
            annotation_filter: None,
        }
    }

    pub fn with_gateway_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.gateway_namespace = Some(namespace.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_gateway_label_filter(mut self, selector: Selector) -> Self {
        self.gateway_label_filter = Some(selector);
        self
    }

    pub fn with_label_filter(mut self, selector: Selector) -> Self {
        self.label_filter = Some(selector);
        self
    }

    pub fn with_annotation_filter(mut self, selector: Selector) -> Self {
        self.annotation_filter = Some(selector);
        self
    }

    fn selects_gateway(&self, gateway: &Gateway) -> bool {
        let metadata = &gateway.metadata;
        if let Some(ns) = &self.gateway_namespace {
            if metadata.namespace.as_ref() != Some(ns) {
                return false;
            }
        }
        match &self.gateway_label_filter {
            Some(selector) => selector.matches(&Labels::from(metadata.labels.clone())),
            None => true,
        }
    }

    fn selects_route(&self, route: &RouteResource) -> bool {
        let metadata = route.metadata();
        if let Some(ns) = &self.namespace {
            if metadata.namespace.as_ref() != Some(ns) {
                return false;
            }
        }
        if let Some(selector) = &self.label_filter {
            if !selector.matches(&Labels::from(metadata.labels.clone())) {
                return false;
            }
        }
        match &self.annotation_filter {
            Some(selector) => selector.matches(&Labels::from(metadata.annotations.clone())),
            None => true,
        }
    }

    /// Binds every route to every gateway listener that admits it and
    /// returns the merged endpoints.
    ///
    /// Any malformed gateway or route fails the whole pass.
    pub fn resolve(
        &self,
        gateways: &[Gateway],
        routes: &[RouteResource],
        namespaces: &[Namespace],
    ) -> Result<Vec<Endpoint>, ResolveError> {
        let gateways = gateways
            .iter()
            .filter(|gateway| {
                let selected = self.selects_gateway(gateway);
                if !selected {
                    debug!(
                        gateway.ns = gateway.metadata.namespace.as_deref().unwrap_or_default(),
                        gateway.name = gateway.metadata.name.as_deref().unwrap_or_default(),
                        "Skipping filtered gateway"
                    );
                }
                selected
            })
            .map(GatewayBinding::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let namespaces = namespaces.iter().collect::<NamespaceIndex>();

        let mut routes_bound = Vec::with_capacity(routes.len());
        for route in routes {
            let metadata = route.metadata();
            if !self.selects_route(route) {
                debug!(
                    kind = %route.kind(),
                    route.ns = metadata.namespace.as_deref().unwrap_or_default(),
                    route.name = metadata.name.as_deref().unwrap_or_default(),
                    "Skipping filtered route"
                );
                continue;
            }
            if let Some(annots) = &metadata.annotations {
                if !annotations::is_managed_by(annots, &self.controller) {
                    debug!(
                        kind = %route.kind(),
                        route.ns = metadata.namespace.as_deref().unwrap_or_default(),
                        route.name = metadata.name.as_deref().unwrap_or_default(),
                        controller = %self.controller,
                        "Skipping route managed by another controller"
                    );
                    continue;
                }
            }
            routes_bound.push(route.binding(self.hostname_annotation)?);
        }

        let mut endpoints = Vec::new();
        for gateway in &gateways {
            for listener in &gateway.listeners {
                for route in &routes_bound {
                    let admission = admit(gateway, listener, route, &namespaces);
                    if let Some(rejection) = &admission.rejection {
                        debug!(
                            gateway.ns = %gateway.namespace,
                            gateway.name = %gateway.name,
                            listener = %listener.name,
                            route.ns = %route.namespace,
                            route.name = %route.name,
                            state = %admission.state,
                            reason = %rejection,
                            "Route is not bound to listener"
                        );
                        continue;
                    }

                    let hostnames =
                        intersect(listener.hostname.as_deref(), route.hostnames.as_slice());
                    if hostnames.is_empty() {
                        debug!(
                            gateway.ns = %gateway.namespace,
                            gateway.name = %gateway.name,
                            listener = %listener.name,
                            route.ns = %route.namespace,
                            route.name = %route.name,
                            "No hostnames in common with listener"
                        );
                        continue;
                    }

                    let meta = route.meta.inherit(&gateway.meta);
                    let resource = route.resource();
                    endpoints.extend(
                        group(&hostnames, &gateway.targets, &meta)
                            .into_iter()
                            .map(|ep| ep.with_label(RESOURCE_LABEL_KEY, &resource)),
                    );
                }
            }
        }

        Ok(merge(endpoints))
    }
}
