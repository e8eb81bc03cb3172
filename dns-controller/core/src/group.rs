use crate::{
    endpoint::trim_root, AddressFamily, Endpoint, Labels, RecordMeta, Targets,
};
use tracing::warn;

/// RFC 1035 limit on the length of a single label.
const MAX_LABEL_LEN: usize = 63;

/// Builds one endpoint per hostname and address family present in `targets`.
///
/// Targets keep their insertion order within each family and exact
/// duplicates are dropped. Hostnames are processed once each, in first-seen
/// order. Nothing is returned unless both hostnames and targets are given.
pub fn group<H, T>(hostnames: H, targets: T, meta: &RecordMeta) -> Vec<Endpoint>
where
    H: IntoIterator,
    H::Item: AsRef<str>,
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut buckets: [Targets; 3] = Default::default();
    for target in targets {
        let target = trim_root(target.as_ref());
        if target.is_empty() {
            continue;
        }
        buckets[AddressFamily::classify(target).index()].insert(target);
    }
    if buckets.iter().all(Targets::is_empty) {
        return Vec::new();
    }

    let mut seen = Vec::<String>::new();
    let mut endpoints = Vec::new();
    for hostname in hostnames {
        let hostname = trim_root(hostname.as_ref());
        if hostname.is_empty() || seen.iter().any(|h| h == hostname) {
            continue;
        }
        seen.push(hostname.to_string());

        if let Some(label) = hostname.split('.').find(|l| l.len() > MAX_LABEL_LEN) {
            warn!(%hostname, %label, "Label is longer than {MAX_LABEL_LEN} characters; skipping");
            continue;
        }

        for family in AddressFamily::ALL {
            let targets = &buckets[family.index()];
            if targets.is_empty() {
                continue;
            }
            endpoints.push(Endpoint {
                dns_name: hostname.to_string(),
                record_type: family.record_type(),
                targets: targets.clone(),
                ttl: meta.ttl,
                provider_specific: meta.provider_specific.clone(),
                set_identifier: meta.set_identifier.clone(),
                labels: Labels::new(),
            });
        }
    }

    endpoints
}
