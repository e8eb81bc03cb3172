#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod annotations;
pub mod gateway;
pub mod labels;
pub mod ttl;

pub use self::labels::{Labels, Selector};
pub use k8s_openapi::{
    api::core::v1::Namespace,
    apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement, ObjectMeta},
};
pub use kube::ResourceExt;
