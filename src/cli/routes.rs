//! Navigation shell: the fixed table of client routes and the view each shows.

use std::fmt;

use crate::cli::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Documents,
    LegalMemory,
    Relationships,
    Changes,
}

/// Routes in navigation order.
pub const ROUTES: [Route; 5] = [
    Route::Dashboard,
    Route::Documents,
    Route::LegalMemory,
    Route::Relationships,
    Route::Changes,
];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Documents => "/documents",
            Self::LegalMemory => "/legal-memory",
            Self::Relationships => "/relationships",
            Self::Changes => "/changes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Documents => "Documents",
            Self::LegalMemory => "Legal Memory",
            Self::Relationships => "Relationships",
            Self::Changes => "Changes",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Dashboard => "Track, recall, and reason across your legal documents",
            Self::Documents => "Upload and manage your legal documents",
            Self::LegalMemory => "Ask questions across all your documents",
            Self::Relationships => "Conflicts, similarities, references and precedents",
            Self::Changes => "Track document evolution and legal memory updates",
        }
    }

    /// Resolve a path; a trailing slash is ignored.
    pub fn from_path(path: &str) -> Result<Self, CliError> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        ROUTES
            .into_iter()
            .find(|r| r.path() == normalized)
            .ok_or_else(|| CliError::UnknownRoute {
                path: trimmed.to_string(),
            })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<15} {}", self.path(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_resolves_to_itself() {
        for route in ROUTES {
            assert_eq!(Route::from_path(route.path()).unwrap(), route);
        }
    }

    #[test]
    fn test_trailing_slash_and_root() {
        assert_eq!(Route::from_path("/changes/").unwrap(), Route::Changes);
        assert_eq!(Route::from_path("/").unwrap(), Route::Dashboard);
        assert_eq!(Route::from_path("").unwrap(), Route::Dashboard);
    }

    #[test]
    fn test_unknown_route() {
        let err = Route::from_path("/settings").unwrap_err();
        assert!(matches!(err, CliError::UnknownRoute { ref path } if path == "/settings"));
    }
}
