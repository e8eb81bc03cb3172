use crate::{
    index::{Resolver, DEFAULT_CONTROLLER},
    k8s::{ttl::GoDuration, Selector},
    snapshot::Source,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use dns_controller_core::{aggregate, merge, Endpoint};
use std::{io::Write, path::PathBuf, time::Duration};
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(
    name = "dns-controller",
    about = "Computes the DNS records implied by gateways and their routes"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "dns_controller=info,warn",
        env = "DNS_CONTROLLER_LOG"
    )]
    log_level: String,

    #[clap(long, default_value = "plain")]
    log_format: LogFormat,

    /// Snapshot files to resolve. Each file is an independent endpoint
    /// source.
    #[clap(long = "snapshot", required = true)]
    snapshots: Vec<PathBuf>,

    /// Targets used for endpoints that have none of their own.
    #[clap(
        long,
        value_delimiter = ',',
        env = "DNS_CONTROLLER_DEFAULT_TARGETS"
    )]
    default_targets: Vec<String>,

    /// Replaces the targets of every endpoint with the default targets.
    #[clap(long)]
    force_default_targets: bool,

    /// Ignores the hostname annotation on routes.
    #[clap(long)]
    ignore_hostname_annotation: bool,

    /// Routes whose controller annotation names another controller are
    /// skipped.
    #[clap(long, default_value = DEFAULT_CONTROLLER)]
    controller: String,

    /// Only reads gateways in this namespace.
    #[clap(long)]
    gateway_namespace: Option<String>,

    /// Only reads routes in this namespace.
    #[clap(long)]
    namespace: Option<String>,

    /// Only reads gateways whose labels match this selector, written as in
    /// `kubectl --selector`.
    #[clap(long)]
    gateway_label_filter: Option<Selector>,

    /// Only reads routes whose labels match this selector.
    #[clap(long)]
    label_filter: Option<Selector>,

    /// Only reads routes whose annotations match this selector.
    #[clap(long)]
    annotation_filter: Option<Selector>,

    #[clap(long, default_value = "10s")]
    resolve_timeout: GoDuration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            snapshots,
            default_targets,
            force_default_targets,
            ignore_hostname_annotation,
            controller,
            gateway_namespace,
            namespace,
            gateway_label_filter,
            label_filter,
            annotation_filter,
            resolve_timeout,
        } = self;

        init_tracing(&log_level, log_format)?;

        let resolve_timeout = Duration::from(resolve_timeout);
        if resolve_timeout.is_zero() {
            bail!("--resolve-timeout must be positive");
        }

        let sources = snapshots
            .into_iter()
            .map(Source::load)
            .collect::<Result<Vec<_>>>()?;
        info!(sources = sources.len(), "Loaded snapshots");

        let mut resolver = Resolver::new(controller, !ignore_hostname_annotation);
        if let Some(ns) = gateway_namespace {
            resolver = resolver.with_gateway_namespace(ns);
        }
        if let Some(ns) = namespace {
            resolver = resolver.with_namespace(ns);
        }
        if let Some(selector) = gateway_label_filter {
            resolver = resolver.with_gateway_label_filter(selector);
        }
        if let Some(selector) = label_filter {
            resolver = resolver.with_label_filter(selector);
        }
        if let Some(selector) = annotation_filter {
            resolver = resolver.with_annotation_filter(selector);
        }
        let pass = tokio::task::spawn_blocking(move || {
            resolve(&resolver, &sources, &default_targets, force_default_targets)
        });
        let endpoints = tokio::time::timeout(resolve_timeout, pass)
            .await
            .with_context(|| format!("resolution did not complete within {resolve_timeout:?}"))?
            .context("resolution task failed")??;
        info!(endpoints = endpoints.len(), "Resolved endpoints");

        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &endpoints)?;
        writeln!(stdout)?;
        Ok(())
    }
}

/// Runs one resolution pass over every source.
///
/// Each source is resolved on its own, default targets are applied across
/// all of them, and the result is merged.
pub fn resolve(
    resolver: &Resolver,
    sources: &[Source],
    default_targets: &[String],
    force_default_targets: bool,
) -> Result<Vec<Endpoint>> {
    let mut results = Vec::with_capacity(sources.len());
    for source in sources {
        let _span = info_span!("source", path = %source.path.display()).entered();
        let endpoints = source
            .snapshot
            .endpoints(resolver)
            .with_context(|| format!("failed to resolve {}", source.path.display()))?;
        debug!(endpoints = endpoints.len(), "Resolved source");
        results.push(endpoints);
    }

    let endpoints = aggregate(results, default_targets, force_default_targets);
    Ok(merge(endpoints))
}

fn init_tracing(log_level: &str, log_format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("invalid log level: {log_level}"))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let init = match log_format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    init.map_err(|error| anyhow::anyhow!(error))
        .context("failed to install tracing subscriber")
}
