use crate::{group, Endpoint};
use tracing::debug;

/// Concatenates the endpoints of independent sources, substituting
/// `default_targets` for an endpoint's own targets.
///
/// An endpoint that already has targets is kept as-is unless
/// `force_defaults` is set. Replacement endpoints are grouped by address
/// family and keep the original's name, TTL, provider-specific properties,
/// set identifier and labels. The result is not merged.
pub fn aggregate<S>(sources: S, default_targets: &[String], force_defaults: bool) -> Vec<Endpoint>
where
    S: IntoIterator<Item = Vec<Endpoint>>,
{
    let sources = sources.into_iter();
    if default_targets.is_empty() {
        return sources.flatten().collect();
    }

    let mut endpoints = Vec::new();
    for endpoint in sources.flatten() {
        if !endpoint.targets.is_empty() && !force_defaults {
            debug!(
                dns_name = %endpoint.dns_name,
                targets = %endpoint.targets,
                "Endpoint has its own targets; ignoring default targets"
            );
            endpoints.push(endpoint);
            continue;
        }

        let replaced = group([&endpoint.dns_name], default_targets, &endpoint.meta());
        endpoints.extend(replaced.into_iter().map(|mut ep| {
            ep.labels = endpoint.labels.clone();
            ep
        }));
    }
    endpoints
}
