use super::models::{ComponentHealth, HealthCheckResponse};
use crate::cli::api_client::ApiClient;
use std::time::{Duration, Instant};
use tokio::time::timeout;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const SLOW_RESPONSE_THRESHOLD_MS: u64 = 1000;

/// Reachability probe for the Legal Memory backend.
pub struct HealthChecker {
    client: ApiClient,
}

impl HealthChecker {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let backend = timeout(CHECK_TIMEOUT, self.check_backend())
            .await
            .unwrap_or_else(|_| ComponentHealth::unhealthy("Timeout".to_string()));

        HealthCheckResponse {
            base_url: self.client.base_url().to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            backend,
        }
    }

    #[tracing::instrument(name = "Check backend health", skip(self))]
    async fn check_backend(&self) -> ComponentHealth {
        let start = Instant::now();

        match self.client.probe_health().await {
            Ok(status) => {
                let elapsed = start.elapsed().as_millis() as u64;
                if !(200..300).contains(&status) {
                    return ComponentHealth::degraded(
                        format!("Backend answered HTTP {}", status),
                        Some(elapsed),
                    );
                }
                if elapsed > SLOW_RESPONSE_THRESHOLD_MS {
                    return ComponentHealth::degraded(
                        "Backend responding slowly".to_string(),
                        Some(elapsed),
                    );
                }
                ComponentHealth::healthy(elapsed)
            }
            Err(e) => {
                tracing::error!("Backend health check failed: {:?}", e);
                ComponentHealth::unhealthy(e.message)
            }
        }
    }
}
