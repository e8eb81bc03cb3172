use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

pub type Labels = BTreeMap<String, String>;

/// Opaque provider properties, carried through unchanged.
pub type ProviderSpecific = BTreeMap<String, String>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Txt,
    Mx,
    Naptr,
    Srv,
    Ns,
    Ptr,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown record type: {0}")]
pub struct InvalidRecordType(String);

/// A record TTL in seconds. Zero means the provider's default applies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ttl(u32);

/// An ordered set of record targets.
///
/// Insertion order is preserved and exact duplicates are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Targets(Vec<String>);

/// The settings shared by every record produced for one resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordMeta {
    pub ttl: Ttl,
    pub provider_specific: ProviderSpecific,
    pub set_identifier: Option<String>,
}

/// A desired DNS record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub dns_name: String,
    pub record_type: RecordType,
    #[serde(default, skip_serializing_if = "Targets::is_empty")]
    pub targets: Targets,
    #[serde(default, rename = "recordTTL", skip_serializing_if = "Ttl::is_unset")]
    pub ttl: Ttl,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub provider_specific: ProviderSpecific,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: Labels,
}

/// Identifies endpoints that describe the same record set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    pub dns_name: String,
    pub record_type: RecordType,
    pub set_identifier: Option<String>,
}

/// Strips a single trailing root dot.
pub(crate) fn trim_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

// === impl RecordType ===

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Naptr => "NAPTR",
            Self::Srv => "SRV",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = InvalidRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "TXT" => Ok(Self::Txt),
            "MX" => Ok(Self::Mx),
            "NAPTR" => Ok(Self::Naptr),
            "SRV" => Ok(Self::Srv),
            "NS" => Ok(Self::Ns),
            "PTR" => Ok(Self::Ptr),
            _ => Err(InvalidRecordType(s.to_string())),
        }
    }
}

// === impl Ttl ===

impl Ttl {
    pub const UNSET: Self = Self(0);

    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> Option<u32> {
        self.is_configured().then_some(self.0)
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn is_unset(&self) -> bool {
        !self.is_configured()
    }

    /// Returns the shorter of two TTLs, ignoring either side that is unset.
    pub fn min_configured(self, other: Self) -> Self {
        match (self.is_configured(), other.is_configured()) {
            (true, true) => Self(self.0.min(other.0)),
            (true, false) => self,
            (false, _) => other,
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// === impl Targets ===

impl Targets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a target unless it is already present. Returns whether the
    /// target was added.
    pub fn insert(&mut self, target: impl Into<String>) -> bool {
        let target = target.into();
        if self.0.contains(&target) {
            return false;
        }
        self.0.push(target);
        true
    }

    pub fn contains(&self, target: &str) -> bool {
        self.0.iter().any(|t| t == target)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Targets {
    fn from(targets: Vec<String>) -> Self {
        targets.into_iter().collect()
    }
}

impl From<Targets> for Vec<String> {
    fn from(Targets(targets): Targets) -> Self {
        targets
    }
}

impl<S: Into<String>> FromIterator<S> for Targets {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut targets = Self::new();
        targets.extend(iter);
        targets
    }
}

impl<S: Into<String>> Extend<S> for Targets {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for target in iter {
            self.insert(target);
        }
    }
}

impl<'t> IntoIterator for &'t Targets {
    type Item = &'t String;
    type IntoIter = std::slice::Iter<'t, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Targets {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Targets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(";"))
    }
}

// === impl RecordMeta ===

impl RecordMeta {
    /// Fills in settings this resource leaves unset from a parent resource.
    ///
    /// The TTL is the shorter configured value of the two. Provider-specific
    /// properties and the set identifier are taken from the parent only when
    /// this resource sets neither.
    pub fn inherit(&self, parent: &Self) -> Self {
        let ttl = self.ttl.min_configured(parent.ttl);
        if self.provider_specific.is_empty() && self.set_identifier.is_none() {
            return Self {
                ttl,
                provider_specific: parent.provider_specific.clone(),
                set_identifier: parent.set_identifier.clone(),
            };
        }
        Self {
            ttl,
            provider_specific: self.provider_specific.clone(),
            set_identifier: self.set_identifier.clone(),
        }
    }
}

// === impl Endpoint ===

impl Endpoint {
    /// Builds an endpoint, trimming a trailing root dot from the name and
    /// from every target.
    pub fn new<T>(dns_name: &str, record_type: RecordType, targets: T) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            dns_name: trim_root(dns_name).to_string(),
            record_type,
            targets: targets
                .into_iter()
                .map(|t| trim_root(t.as_ref()).to_string())
                .collect(),
            ttl: Ttl::UNSET,
            provider_specific: ProviderSpecific::new(),
            set_identifier: None,
            labels: Labels::new(),
        }
    }

    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_set_identifier(mut self, set_identifier: impl Into<String>) -> Self {
        self.set_identifier = Some(set_identifier.into());
        self
    }

    pub fn with_provider_specific(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.provider_specific.insert(name.into(), value.into());
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_meta(mut self, meta: &RecordMeta) -> Self {
        self.ttl = meta.ttl;
        self.provider_specific = meta.provider_specific.clone();
        self.set_identifier = meta.set_identifier.clone();
        self
    }

    pub fn meta(&self) -> RecordMeta {
        RecordMeta {
            ttl: self.ttl,
            provider_specific: self.provider_specific.clone(),
            set_identifier: self.set_identifier.clone(),
        }
    }

    pub fn key(&self) -> EndpointKey {
        EndpointKey {
            dns_name: self.dns_name.clone(),
            record_type: self.record_type,
            set_identifier: self.set_identifier.clone(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} IN {} {} {}",
            self.dns_name,
            self.ttl,
            self.record_type,
            self.set_identifier.as_deref().unwrap_or_default(),
            self.targets,
        )?;
        if !self.provider_specific.is_empty() {
            write!(f, " {:?}", self.provider_specific)?;
        }
        Ok(())
    }
}
