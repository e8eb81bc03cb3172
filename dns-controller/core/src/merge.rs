use crate::{Endpoint, EndpointKey};
use ahash::AHashMap as HashMap;

/// Accumulates endpoints, combining those that describe the same record set.
///
/// Endpoints share a record set when their name, record type and set
/// identifier are equal. Targets of later endpoints are appended to the first
/// one seen; its TTL, provider-specific properties and labels are kept.
#[derive(Debug, Default)]
pub struct EndpointMerger {
    index: HashMap<EndpointKey, usize>,
    endpoints: Vec<Endpoint>,
}

/// Merges a list of endpoints in one pass.
pub fn merge(endpoints: impl IntoIterator<Item = Endpoint>) -> Vec<Endpoint> {
    endpoints
        .into_iter()
        .collect::<EndpointMerger>()
        .into_endpoints()
}

// === impl EndpointMerger ===

impl EndpointMerger {
    pub fn insert(&mut self, endpoint: Endpoint) {
        match self.index.get(&endpoint.key()) {
            Some(&idx) => self.endpoints[idx].targets.extend(endpoint.targets),
            None => {
                self.index.insert(endpoint.key(), self.endpoints.len());
                self.endpoints.push(endpoint);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn into_endpoints(self) -> Vec<Endpoint> {
        self.endpoints
    }
}

impl Extend<Endpoint> for EndpointMerger {
    fn extend<T: IntoIterator<Item = Endpoint>>(&mut self, iter: T) {
        for endpoint in iter {
            self.insert(endpoint);
        }
    }
}

impl FromIterator<Endpoint> for EndpointMerger {
    fn from_iter<T: IntoIterator<Item = Endpoint>>(iter: T) -> Self {
        let mut merger = Self::default();
        merger.extend(iter);
        merger
    }
}
