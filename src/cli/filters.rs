//! Client-side filtering over already-fetched lists, and the empty-state text
//! each view shows when a (filtered) list comes back empty.

use crate::models::{
    ChatSession, Conflict, ConflictType, Document, DocumentType, Severity,
};

/// Case-insensitive substring match. An empty needle matches everything.
pub fn matches_text(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub search: Option<String>,
    pub kind: Option<DocumentType>,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &Document) -> bool {
        let text_ok = self
            .search
            .as_deref()
            .map(|q| matches_text(&doc.name, q))
            .unwrap_or(true);
        let kind_ok = self.kind.map(|k| doc.kind == k).unwrap_or(true);
        text_ok && kind_ok
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some() || self.search.as_deref().is_some_and(|q| !q.trim().is_empty())
    }

    pub fn apply<'a>(&self, docs: &'a [Document]) -> Vec<&'a Document> {
        docs.iter().filter(|d| self.matches(d)).collect()
    }
}

/// Search over session names and last-message previews.
pub fn filter_sessions<'a>(sessions: &'a [ChatSession], search: &str) -> Vec<&'a ChatSession> {
    sessions
        .iter()
        .filter(|s| {
            matches_text(&s.name, search)
                || s.last_message
                    .as_deref()
                    .map(|m| !search.trim().is_empty() && matches_text(m, search))
                    .unwrap_or(false)
        })
        .collect()
}

/// `None` in any field means "all".
#[derive(Debug, Clone, Default)]
pub struct ConflictFilter {
    pub kind: Option<ConflictType>,
    pub severity: Option<Severity>,
    pub search: Option<String>,
}

impl ConflictFilter {
    pub fn matches(&self, conflict: &Conflict) -> bool {
        let kind_ok = self.kind.map(|k| conflict.kind == k).unwrap_or(true);
        let severity_ok = self.severity.map(|s| conflict.severity == s).unwrap_or(true);
        let text_ok = match self.search.as_deref() {
            None => true,
            Some(q) => {
                matches_text(&conflict.description, q)
                    || conflict.documents.iter().any(|d| {
                        matches_text(&d.name, q)
                            || d.section.as_deref().is_some_and(|s| matches_text(s, q))
                    })
            }
        };
        kind_ok && severity_ok && text_ok
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some() || self.severity.is_some() || self.search.is_some()
    }

    pub fn apply<'a>(&self, conflicts: &'a [Conflict]) -> Vec<&'a Conflict> {
        conflicts.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Count of records per relationship type, in display order.
pub fn count_by_type(conflicts: &[Conflict]) -> Vec<(ConflictType, usize)> {
    ConflictType::ALL
        .into_iter()
        .map(|t| (t, conflicts.iter().filter(|c| c.kind == t).count()))
        .collect()
}

// ── Empty states ─────────────────────────────────────

pub fn documents_empty_message(filter: &DocumentFilter) -> String {
    if filter.is_active() {
        "No documents match your search.".to_string()
    } else {
        "No documents yet. Upload your first document to get started with Legal Memory."
            .to_string()
    }
}

pub fn sessions_empty_message(search: &str) -> String {
    if search.trim().is_empty() {
        "No conversations yet. Ask a question to start one.".to_string()
    } else {
        format!("No conversations match \"{}\".", search.trim())
    }
}

pub fn relationships_empty_message(filter: &ConflictFilter) -> String {
    if filter.is_active() {
        "No relationships match the selected filters.".to_string()
    } else {
        "No relationships detected yet.".to_string()
    }
}

pub const CHANGES_EMPTY_MESSAGE: &str =
    "No changes yet. Document changes and updates will appear here.";

pub const ACTIVITY_EMPTY_MESSAGE: &str = "No recent activity. Upload documents to get started.";
