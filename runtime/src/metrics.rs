//! Prometheus metrics for observability and monitoring.
//!
//! The [`Store`](crate::Store) records its metrics through the `metrics`
//! facade unconditionally; they are dropped unless a recorder is installed.
//! [`MetricsServer`] installs the Prometheus recorder, serves it over HTTP
//! and renders the exposition text on demand.
//!
//! # Example
//!
//! ```rust,no_run
//! use reactive_todo_runtime::metrics::MetricsServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start()?;
//!
//! if let Some(text) = server.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics recorder served over HTTP on a fixed address.
pub struct MetricsServer {
    addr: SocketAddr,
    handle: Option<PrometheusHandle>,
}

impl MetricsServer {
    /// Create a new metrics server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Socket address the HTTP listener binds (e.g., `0.0.0.0:9090`)
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr, handle: None }
    }

    /// The configured address
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Describe the store metrics, install the Prometheus recorder and serve
    /// it over HTTP on the configured address.
    ///
    /// Must be called from within a Tokio runtime: the listener is bound
    /// here and served by a spawned task.
    ///
    /// # Errors
    ///
    /// Returns error if there is no Tokio runtime, the address cannot be
    /// bound, or another recorder is already installed.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| MetricsError::Install(e.to_string()))?;

        let (recorder, exporter) = PrometheusBuilder::new()
            .with_http_listener(self.addr)
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_001, 0.000_01, 0.000_1, 0.001, 0.01, 0.1, 1.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?
            .build()
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        let handle = recorder.handle();
        metrics::set_global_recorder(recorder).map_err(|e| MetricsError::Install(e.to_string()))?;
        register_metrics();

        let addr = self.addr;
        runtime.spawn(async move {
            if let Err(_error) = exporter.await {
                // ExporterError (metrics-exporter-prometheus 0.15) implements neither Debug nor Display.
                tracing::error!(%addr, "Metrics listener stopped");
            }
        });

        self.handle = Some(handle);
        tracing::info!(addr = %self.addr, "Serving Prometheus metrics");
        Ok(())
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the recorder hasn't been installed by this server.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register descriptions for every metric the store records.
fn register_metrics() {
    describe_counter!(
        "store.commands.total",
        "Total number of actions sent to stores"
    );
    describe_counter!(
        "store.state.published",
        "Total number of states published to state subscribers"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time taken to run the reducer for one action"
    );
    describe_histogram!(
        "store.effects.count",
        "Number of effects returned by the reducer per action"
    );
    describe_counter!(
        "store.effects.executed",
        "Total number of effects executed, labelled by type"
    );
    describe_counter!(
        "store.effects.dropped_feedback",
        "Total number of effect feedback actions dropped because the store was shutting down"
    );
    describe_counter!(
        "store.shutdown.initiated",
        "Total number of graceful shutdowns started"
    );
    describe_counter!(
        "store.shutdown.completed",
        "Total number of graceful shutdowns that drained all effects"
    );
    describe_counter!(
        "store.shutdown.timeout",
        "Total number of graceful shutdowns that timed out"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Total number of actions rejected during shutdown"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[test]
    fn render_is_none_before_start() {
        let server = MetricsServer::new(SocketAddr::from(([127, 0, 0, 1], 9090)));
        assert!(server.render().is_none());
        assert_eq!(server.addr().port(), 9090);
    }

    #[test]
    fn start_needs_a_runtime() {
        let mut server = MetricsServer::new(SocketAddr::from(([127, 0, 0, 1], 0)));
        assert!(matches!(server.start(), Err(MetricsError::Install(_))));
    }

    #[tokio::test]
    async fn start_listens_on_configured_address() -> Result<(), Box<dyn std::error::Error>> {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;

        let mut server = MetricsServer::new(addr);
        server.start()?;
        metrics::counter!("store.commands.total").increment(1);

        let mut stream = tokio::net::TcpStream::connect(addr).await?;
        stream
            .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await?;
        let mut response = String::new();
        stream.read_to_string(&mut response).await?;

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("store_commands_total"));
        assert!(server.render().is_some_and(|text| text.contains("store_commands_total")));
        Ok(())
    }
}
