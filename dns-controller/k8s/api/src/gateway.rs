//! Gateway API resources and the helpers used to read them.

use crate::{LabelSelector, LabelSelectorRequirement};

pub use gateway_api::apis::{
    experimental::{
        tcproutes::{TCPRoute, TCPRouteParentRefs, TCPRouteSpec, TCPRouteStatus},
        tlsroutes::{TLSRoute, TLSRouteParentRefs, TLSRouteSpec, TLSRouteStatus},
        udproutes::{UDPRoute, UDPRouteParentRefs, UDPRouteSpec, UDPRouteStatus},
    },
    standard::{
        gateways::{
            Gateway, GatewayListeners, GatewayListenersAllowedRoutes,
            GatewayListenersAllowedRoutesKinds, GatewayListenersAllowedRoutesNamespaces,
            GatewayListenersAllowedRoutesNamespacesFrom as FromNamespaces,
            GatewayListenersAllowedRoutesNamespacesSelector as NamespacesSelector, GatewaySpec,
            GatewayStatus, GatewayStatusAddresses,
        },
        grpcroutes::{GRPCRoute, GRPCRouteParentRefs, GRPCRouteSpec, GRPCRouteStatus},
        httproutes::{HTTPRoute, HTTPRouteParentRefs, HTTPRouteSpec, HTTPRouteStatus},
    },
};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;

pub const GROUP: &str = "gateway.networking.k8s.io";
pub const GATEWAY_KIND: &str = "Gateway";

/// The condition type a gateway controller sets on a route it admits.
pub const ACCEPTED: &str = "Accepted";

/// Whether a parent reference with the given group and kind targets a
/// Gateway. Unset group and kind default to the Gateway API group and
/// `Gateway`.
pub fn targets_gateway(group: Option<&str>, kind: Option<&str>) -> bool {
    group.unwrap_or(GROUP) == GROUP && kind.unwrap_or(GATEWAY_KIND) == GATEWAY_KIND
}

/// Reads a listener's namespace selector as a Kubernetes label selector.
pub fn namespace_selector(selector: &NamespacesSelector) -> LabelSelector {
    let match_expressions = selector.match_expressions.as_ref().map(|exprs| {
        exprs
            .iter()
            .map(|expr| LabelSelectorRequirement {
                key: expr.key.clone(),
                operator: expr.operator.clone(),
                values: expr.values.clone(),
            })
            .collect()
    });
    LabelSelector {
        match_labels: selector.match_labels.clone(),
        match_expressions,
    }
}
