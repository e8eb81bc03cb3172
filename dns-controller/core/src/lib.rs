#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod aggregate;
pub mod endpoint;
mod group;
pub mod hostname;
mod merge;
mod target;

pub use self::{
    aggregate::aggregate,
    endpoint::{
        Endpoint, EndpointKey, InvalidRecordType, Labels, ProviderSpecific, RecordMeta,
        RecordType, Targets, Ttl,
    },
    group::group,
    hostname::intersect,
    merge::{merge, EndpointMerger},
    target::AddressFamily,
};

/// The label key recording which resource produced an endpoint.
pub const RESOURCE_LABEL_KEY: &str = "resource";
