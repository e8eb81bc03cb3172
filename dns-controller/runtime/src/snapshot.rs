//! Point-in-time copies of the resources one source resolves over.

use anyhow::{Context, Result};
use dns_controller_core::Endpoint;
use dns_controller_k8s_api::{
    gateway::{GRPCRoute, Gateway, HTTPRoute, TCPRoute, TLSRoute, UDPRoute},
    Namespace,
};
use dns_controller_k8s_index::{ResolveError, Resolver, RouteResource};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The resources read from one snapshot file.
///
/// Each snapshot is an independent endpoint source. Resolved endpoints are
/// followed by any literal `endpoints` the snapshot lists.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub gateways: Vec<Gateway>,
    #[serde(rename = "httproutes")]
    pub http_routes: Vec<HTTPRoute>,
    #[serde(rename = "grpcroutes")]
    pub grpc_routes: Vec<GRPCRoute>,
    #[serde(rename = "tlsroutes")]
    pub tls_routes: Vec<TLSRoute>,
    #[serde(rename = "tcproutes")]
    pub tcp_routes: Vec<TCPRoute>,
    #[serde(rename = "udproutes")]
    pub udp_routes: Vec<UDPRoute>,
    pub namespaces: Vec<Namespace>,
    pub endpoints: Vec<Endpoint>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

// === impl Snapshot ===

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::parse(&contents, Format::of(path))
            .with_context(|| format!("failed to parse snapshot {}", path.display()))
    }

    pub fn parse(contents: &str, format: Format) -> Result<Self> {
        let snapshot = match format {
            Format::Json => serde_json::from_str(contents)?,
            Format::Yaml => serde_yaml::from_str(contents)?,
        };
        Ok(snapshot)
    }

    /// All routes in the snapshot, in kind order.
    pub fn routes(&self) -> Vec<RouteResource> {
        let Self {
            http_routes,
            grpc_routes,
            tls_routes,
            tcp_routes,
            udp_routes,
            ..
        } = self;
        http_routes
            .iter()
            .cloned()
            .map(RouteResource::from)
            .chain(grpc_routes.iter().cloned().map(RouteResource::from))
            .chain(tls_routes.iter().cloned().map(RouteResource::from))
            .chain(tcp_routes.iter().cloned().map(RouteResource::from))
            .chain(udp_routes.iter().cloned().map(RouteResource::from))
            .collect()
    }

    /// The endpoints this source contributes.
    pub fn endpoints(&self, resolver: &Resolver) -> Result<Vec<Endpoint>, ResolveError> {
        let mut endpoints = resolver.resolve(&self.gateways, &self.routes(), &self.namespaces)?;
        endpoints.extend(self.endpoints.iter().cloned());
        Ok(endpoints)
    }
}

/// A snapshot file and the source name it is logged under.
#[derive(Clone, Debug)]
pub struct Source {
    pub path: PathBuf,
    pub snapshot: Snapshot,
}

impl Source {
    pub fn load(path: PathBuf) -> Result<Self> {
        let snapshot = Snapshot::load(&path)?;
        Ok(Self { path, snapshot })
    }
}

// === impl Format ===

impl Format {
    /// YAML for `.yaml` and `.yml` files, JSON otherwise.
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}
