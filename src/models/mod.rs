mod change;
mod chat;
mod conflict;
mod document;

pub use change::*;
pub use chat::*;
pub use conflict::*;
pub use document::*;

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Renders a backend timestamp in local time with `format`.
///
/// Accepts RFC 3339 and offset-less ISO 8601 (read as UTC); anything else is
/// returned verbatim.
pub fn local_time(raw: &str, format: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.with_timezone(&Local).format(format).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive
            .and_utc()
            .with_timezone(&Local)
            .format(format)
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Records the client caches by backend id.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl Entity for Document {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Conflict {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for ChatSession {
    fn id(&self) -> &str {
        &self.id
    }
}
