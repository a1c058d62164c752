//! Plumbing shared by the view commands: runtime, client, output helpers.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;

use crate::cli::api_client::ApiClient;
use crate::cli::error::CliError;
use crate::configuration::Settings;

/// Default refresh period for `--watch`.
pub const WATCH_INTERVAL: Duration = Duration::from_secs(15);

/// Run `fut` to completion on a fresh single-threaded runtime.
pub fn block_on<F, T>(fut: F) -> Result<T, CliError>
where
    F: Future<Output = T>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)?;
    Ok(rt.block_on(fut))
}

pub fn api_client(settings: &Settings) -> Result<ApiClient, CliError> {
    Ok(ApiClient::from_settings(&settings.api)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{}", out);
    Ok(())
}

/// Re-run `render` every `interval` until Ctrl-C.
pub async fn watch_loop<F, Fut>(interval: Duration, mut render: F) -> Result<(), CliError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), CliError>>,
{
    loop {
        render().await?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = tokio::time::sleep(interval) => {}
        }
        // Clear screen and move the cursor home before the next frame.
        print!("\x1B[2J\x1B[H");
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    } else {
        s.to_string()
    }
}
