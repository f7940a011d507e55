use super::*;
use async_trait::async_trait;
use reqwest::StatusCode;
use shared::protocol::{PassengerInput, PredictionResult};

use crate::ClientError;

struct HealthOnly {
    healthy: bool,
}

#[async_trait]
impl PredictionService for HealthOnly {
    async fn check_health(&self) -> Result<(), ClientError> {
        if self.healthy {
            Ok(())
        } else {
            Err(ClientError::Service {
                status: StatusCode::SERVICE_UNAVAILABLE,
                detail: None,
            })
        }
    }

    async fn predict(&self, _input: &PassengerInput) -> Result<PredictionResult, ClientError> {
        Err(ClientError::MalformedResponse("not scripted".into()))
    }
}

struct Hanging;

#[async_trait]
impl PredictionService for Hanging {
    async fn check_health(&self) -> Result<(), ClientError> {
        std::future::pending().await
    }

    async fn predict(&self, _input: &PassengerInput) -> Result<PredictionResult, ClientError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn healthy_service_resolves_connected() {
    let probe = ConnectivityProbe::spawn(Arc::new(HealthOnly { healthy: true }));
    assert_eq!(probe.resolved().await, ConnectivityStatus::Connected);
}

#[tokio::test]
async fn unhealthy_service_resolves_disconnected() {
    assert_eq!(
        check(&HealthOnly { healthy: false }).await,
        ConnectivityStatus::Disconnected
    );
}

#[tokio::test]
async fn hung_check_stays_unknown() {
    let probe = ConnectivityProbe::spawn(Arc::new(Hanging));
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(probe.status(), ConnectivityStatus::Unknown);
}
