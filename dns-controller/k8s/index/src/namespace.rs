use ahash::AHashMap as HashMap;
use dns_controller_k8s_api::{Labels, Namespace, ResourceExt};

/// Namespace labels by namespace name, for listeners that select namespaces.
#[derive(Debug, Default)]
pub struct NamespaceIndex {
    index: HashMap<String, Labels>,
}

// === impl NamespaceIndex ===

impl NamespaceIndex {
    pub fn insert(&mut self, name: impl Into<String>, labels: impl Into<Labels>) {
        self.index.insert(name.into(), labels.into());
    }

    pub fn get(&self, name: &str) -> Option<&Labels> {
        self.index.get(name)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl<'n> FromIterator<&'n Namespace> for NamespaceIndex {
    fn from_iter<T: IntoIterator<Item = &'n Namespace>>(iter: T) -> Self {
        let mut index = Self::default();
        for ns in iter {
            index.insert(ns.name_any(), ns.labels().clone());
        }
        index
    }
}
