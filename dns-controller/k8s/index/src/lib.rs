#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod admission;
pub mod gateway;
mod namespace;
mod resolver;
pub mod routes;


pub use self::{
    admission::{admit, Admission, AdmissionState, Rejection},
    gateway::{GatewayBinding, InvalidGateway, ListenerBinding},
    namespace::NamespaceIndex,
    resolver::{resolve, ResolveError, Resolver, DEFAULT_CONTROLLER},
    routes::{
        InvalidRoute, ParentRefFields, RouteAdapter, RouteBinding, RouteKind, RouteResource,
    },
};
