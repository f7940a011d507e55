use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ServiceErrorBody,
    protocol::{HealthReport, PassengerInput, PredictionResult},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod error;
pub mod form;
pub mod orchestrator;
pub mod presenter;
pub mod probe;
pub mod runtime;

pub use config::{load_settings, ClientSettings};
pub use error::{ClientError, FailureKind, InvalidInput};
pub use form::{find_preset, FormState, PassengerForm, Preset, PRESETS};
pub use orchestrator::{Notice, NoticeKind, Phase, UiEvent, UiOrchestrator, ViewState};
pub use presenter::{present, ResultView};
pub use probe::ConnectivityProbe;
pub use runtime::{launch, LaunchOptions, OrchestratorHandle};

const HEALTH_PATH: &str = "health";
const PREDICT_PATH: &str = "predict";

/// Remote prediction service as seen by the client.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Succeeds when the service answers its health endpoint with a 2xx status.
    async fn check_health(&self) -> Result<(), ClientError>;
    async fn predict(&self, input: &PassengerInput) -> Result<PredictionResult, ClientError>;
}

pub struct HttpPredictionClient {
    http: Client,
    health_url: Url,
    predict_url: Url,
}

impl HttpPredictionClient {
    pub fn new(base_url: Url) -> anyhow::Result<Self> {
        Self::with_http(Client::new(), base_url)
    }

    pub fn from_settings(settings: &ClientSettings) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Self::with_http(builder.build()?, settings.base_url()?)
    }

    fn with_http(http: Client, base_url: Url) -> anyhow::Result<Self> {
        let base_url = config::parse_server_url(base_url.as_str())?;
        Ok(Self {
            http,
            health_url: base_url.join(HEALTH_PATH)?,
            predict_url: base_url.join(PREDICT_PATH)?,
        })
    }

    pub fn into_service(self) -> Arc<dyn PredictionService> {
        Arc::new(self)
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn check_health(&self) -> Result<(), ClientError> {
        let res = self.http.get(self.health_url.clone()).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::Service {
                status,
                detail: None,
            });
        }

        // The body is informational only.
        match res.json::<HealthReport>().await {
            Ok(report) => info!(
                status = report.status.as_deref().unwrap_or("unspecified"),
                model_loaded = ?report.model_loaded,
                "prediction service reachable"
            ),
            Err(err) => debug!(error = %err, "health body not understood"),
        }
        Ok(())
    }

    async fn predict(&self, input: &PassengerInput) -> Result<PredictionResult, ClientError> {
        debug!(?input, url = %self.predict_url, "sending prediction request");
        let res = self
            .http
            .post(self.predict_url.clone())
            .json(input)
            .send()
            .await?;
        let status = res.status();
        let body = res.bytes().await?;

        if !status.is_success() {
            let detail = ServiceErrorBody::parse(&body).map(|body| body.error);
            warn!(%status, detail = detail.as_deref().unwrap_or(""), "prediction request rejected");
            return Err(ClientError::Service { status, detail });
        }

        serde_json::from_slice::<PredictionResult>(&body).map_err(|err| {
            warn!(error = %err, "prediction response did not match the expected shape");
            ClientError::MalformedResponse(err.to_string())
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
