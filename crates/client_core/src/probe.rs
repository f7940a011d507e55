//! One-shot reachability check run when the client starts.

use std::sync::Arc;

use shared::domain::ConnectivityStatus;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{info, warn};

use crate::PredictionService;

pub async fn check(service: &dyn PredictionService) -> ConnectivityStatus {
    match service.check_health().await {
        Ok(()) => ConnectivityStatus::Connected,
        Err(err) => {
            warn!(error = %err, "health check failed");
            ConnectivityStatus::Disconnected
        }
    }
}

/// A health check running in the background. No retry and no timeout: if the
/// request hangs, the status stays `Unknown`.
pub struct ConnectivityProbe {
    status: watch::Receiver<ConnectivityStatus>,
    _task: JoinHandle<()>,
}

impl ConnectivityProbe {
    pub fn spawn(service: Arc<dyn PredictionService>) -> Self {
        let (tx, rx) = watch::channel(ConnectivityStatus::Unknown);
        let task = tokio::spawn(async move {
            let status = check(service.as_ref()).await;
            info!(?status, "startup connectivity probe finished");
            let _ = tx.send(status);
        });
        Self {
            status: rx,
            _task: task,
        }
    }

    pub fn status(&self) -> ConnectivityStatus {
        *self.status.borrow()
    }

    /// Waits for the probe to settle. Returns `Unknown` if the probe task died.
    pub async fn resolved(mut self) -> ConnectivityStatus {
        let resolved = match self
            .status
            .wait_for(|status| *status != ConnectivityStatus::Unknown)
            .await
        {
            Ok(status) => *status,
            Err(_) => ConnectivityStatus::Unknown,
        };
        resolved
    }
}

#[cfg(test)]
#[path = "tests/probe_tests.rs"]
mod tests;
