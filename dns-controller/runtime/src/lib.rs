#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use dns_controller_core as core;
pub use dns_controller_k8s_api as k8s;
pub use dns_controller_k8s_index as index;

mod args;
pub mod snapshot;

pub use self::{
    args::{resolve, Args, LogFormat},
    snapshot::{Snapshot, Source},
};
