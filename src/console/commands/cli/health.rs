use crate::cli::error::{ApiError, CliError};
use crate::cli::progress;
use crate::configuration::Settings;
use crate::console::commands::cli::common;
use crate::console::commands::CallableTrait;
use crate::health::{ComponentStatus, HealthCheckResponse, HealthChecker};

/// `legalmem health [--json]`
///
/// Fails (exit 1) when the backend cannot be reached at all.
pub struct HealthCommand {
    pub settings: Settings,
    pub json: bool,
}

impl HealthCommand {
    pub fn new(settings: Settings, json: bool) -> Self {
        Self { settings, json }
    }
}

pub fn render_health(report: &HealthCheckResponse) -> String {
    let backend = &report.backend;
    let (icon, label) = match backend.status {
        ComponentStatus::Healthy => ("✓", "healthy"),
        ComponentStatus::Degraded => ("!", "degraded"),
        ComponentStatus::Unhealthy => ("✗", "unreachable"),
    };

    let mut out = format!("{} Backend {} at {}", icon, label, report.base_url);
    if let Some(ms) = backend.response_time_ms {
        out.push_str(&format!(" ({} ms)", ms));
    }
    out.push('\n');
    if let Some(message) = &backend.message {
        out.push_str(&format!("  {}\n", message));
    }
    out.push_str(&format!("  legalmem {}\n", report.client_version));
    out
}

impl CallableTrait for HealthCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let checker = HealthChecker::new(common::api_client(&self.settings)?);
        let json = self.json;

        let report = common::block_on(async move {
            let pb = (!json).then(|| progress::spinner("Checking backend..."));
            let report = checker.check_all().await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
            report
        })?;

        if json {
            common::print_json(&report)?;
        } else {
            print!("{}", render_health(&report));
        }

        if !report.backend.is_reachable() {
            let message = report
                .backend
                .message
                .unwrap_or_else(|| "backend unreachable".to_string());
            return Err(Box::new(CliError::Api(ApiError {
                status: ApiError::NETWORK,
                message,
            })));
        }
        Ok(())
    }
}
