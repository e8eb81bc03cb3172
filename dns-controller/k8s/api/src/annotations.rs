//! Record settings carried by resource annotations.

use crate::ttl;
use dns_controller_core::{ProviderSpecific, RecordMeta, Ttl};
use std::collections::BTreeMap;
use tracing::warn;

pub type Annotations = BTreeMap<String, String>;

pub const PREFIX: &str = "external-dns.alpha.kubernetes.io/";

pub const HOSTNAME: &str = "external-dns.alpha.kubernetes.io/hostname";
pub const TARGET: &str = "external-dns.alpha.kubernetes.io/target";
pub const TTL: &str = "external-dns.alpha.kubernetes.io/ttl";
pub const SET_IDENTIFIER: &str = "external-dns.alpha.kubernetes.io/set-identifier";
pub const CONTROLLER: &str = "external-dns.alpha.kubernetes.io/controller";
pub const ALIAS: &str = "external-dns.alpha.kubernetes.io/alias";
pub const CLOUDFLARE_PROXIED: &str = "external-dns.alpha.kubernetes.io/cloudflare-proxied";
pub const CLOUDFLARE_CUSTOM_HOSTNAME: &str =
    "external-dns.alpha.kubernetes.io/cloudflare-custom-hostname";

/// Annotation prefixes copied into provider-specific properties, paired with
/// the property name prefix each maps to.
const PROVIDER_PREFIXES: [(&str, &str); 4] = [
    ("aws-", "aws/"),
    ("scw-", "scw/"),
    ("ibmcloud-", "ibmcloud-"),
    ("webhook-", "webhook/"),
];

/// Hostnames listed in the hostname annotation. Whitespace is ignored.
pub fn hostnames(annotations: &Annotations) -> Vec<String> {
    annotations
        .get(HOSTNAME)
        .map(|v| split_list(v))
        .unwrap_or_default()
}

/// Targets listed in the target annotation, with any root dot trimmed.
///
/// An annotation that lists nothing is treated as absent.
pub fn targets(annotations: &Annotations) -> Vec<String> {
    let Some(value) = annotations.get(TARGET) else {
        return Vec::new();
    };
    let targets = split_list(value)
        .into_iter()
        .map(|t| t.trim_end_matches('.').to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();
    if targets.is_empty() {
        warn!(annotation = TARGET, value = %value, "Target annotation lists no targets; ignoring");
    }
    targets
}

/// The TTL annotation, or [`Ttl::UNSET`] when absent.
pub fn ttl(annotations: &Annotations) -> Result<Ttl, ttl::ParseError> {
    match annotations.get(TTL) {
        Some(value) => ttl::parse(value),
        None => Ok(Ttl::UNSET),
    }
}

/// Extracts provider-specific properties and the set identifier.
pub fn provider_specific(annotations: &Annotations) -> (ProviderSpecific, Option<String>) {
    let mut props = ProviderSpecific::new();
    for key in [CLOUDFLARE_PROXIED, CLOUDFLARE_CUSTOM_HOSTNAME] {
        if let Some(v) = annotations.get(key) {
            props.insert(key.to_string(), v.clone());
        }
    }
    if annotations.get(ALIAS).is_some_and(|v| v == "true") {
        props.insert("alias".to_string(), "true".to_string());
    }

    let mut set_identifier = None;
    for (key, value) in annotations {
        if key == SET_IDENTIFIER {
            set_identifier = Some(value.clone());
            continue;
        }
        let Some(attr) = key.strip_prefix(PREFIX) else {
            continue;
        };
        for (prefix, name) in PROVIDER_PREFIXES {
            if let Some(attr) = attr.strip_prefix(prefix) {
                props.insert(format!("{name}{attr}"), value.clone());
                break;
            }
        }
    }

    (props, set_identifier)
}

/// Collects the record settings of one resource. An invalid TTL is logged and
/// left unset.
pub fn record_meta(annotations: &Annotations, resource: &str) -> RecordMeta {
    let ttl = ttl(annotations).unwrap_or_else(|error| {
        warn!(%resource, %error, "Invalid TTL annotation; ignoring");
        Ttl::UNSET
    });
    let (provider_specific, set_identifier) = provider_specific(annotations);
    RecordMeta {
        ttl,
        provider_specific,
        set_identifier,
    }
}

/// Whether a resource is handled by `controller`. Resources that do not name
/// a controller belong to every controller.
pub fn is_managed_by(annotations: &Annotations, controller: &str) -> bool {
    !matches!(annotations.get(CONTROLLER), Some(v) if v != controller)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|v| v.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|v| !v.is_empty())
        .collect()
}
