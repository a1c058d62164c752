use crate::cli::conflicts::{ConflictBoard, StatusChange};
use crate::cli::error::CliError;
use crate::cli::filters::{count_by_type, relationships_empty_message, ConflictFilter};
use crate::cli::progress;
use crate::cli::store::EntityStore;
use crate::configuration::Settings;
use crate::console::commands::cli::common::{self, truncate};
use crate::console::commands::CallableTrait;
use crate::models::{Conflict, ConflictStatus, ConflictType, Severity};

fn board(settings: &Settings) -> Result<ConflictBoard, CliError> {
    Ok(ConflictBoard::new(
        common::api_client(settings)?,
        EntityStore::new(),
    ))
}

pub fn render_relationships(conflicts: &[&Conflict]) -> String {
    let mut out = format!(
        "{:<38} {:<11} {:<8} {:<10} {}\n",
        "ID", "TYPE", "SEVERITY", "STATUS", "DOCUMENTS"
    );
    out.push_str(&format!("{}\n", "─".repeat(120)));
    for c in conflicts {
        let documents: Vec<String> = c.documents.iter().map(|d| d.name.clone()).collect();
        out.push_str(&format!(
            "{:<38} {:<11} {} {:<6} {:<10} {}\n",
            truncate(&c.id, 36),
            c.kind,
            progress::status_icon(&c.severity.to_string()),
            c.severity,
            c.status,
            truncate(&documents.join(" ↔ "), 60),
        ));
    }
    out
}

pub fn render_relationship(conflict: &Conflict) -> String {
    let mut out = format!(
        "{} ({}, {} severity)\n",
        conflict.kind, conflict.status, conflict.severity
    );
    out.push_str(&format!("  id: {}\n", conflict.id));
    out.push_str("  documents:\n");
    for doc in &conflict.documents {
        out.push_str(&format!("    - {}\n", doc));
    }
    out.push_str(&format!("\n{}\n", conflict.description));
    out
}

fn render_counts(counts: &[(ConflictType, usize)]) -> String {
    counts
        .iter()
        .map(|(kind, n)| format!("{kind}: {n}"))
        .collect::<Vec<_>>()
        .join("  ")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// relationships list
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem relationships list [--type T] [--severity S] [--search Q] [--json]`
pub struct RelationshipsListCommand {
    pub settings: Settings,
    pub kind: Option<String>,
    pub severity: Option<String>,
    pub search: Option<String>,
    pub json: bool,
}

impl RelationshipsListCommand {
    pub fn new(
        settings: Settings,
        kind: Option<String>,
        severity: Option<String>,
        search: Option<String>,
        json: bool,
    ) -> Self {
        Self {
            settings,
            kind,
            severity,
            search,
            json,
        }
    }

    fn filter(&self) -> Result<ConflictFilter, CliError> {
        let kind = self
            .kind
            .as_deref()
            .map(str::parse::<ConflictType>)
            .transpose()
            .map_err(CliError::InvalidArgument)?;
        let severity = self
            .severity
            .as_deref()
            .map(str::parse::<Severity>)
            .transpose()
            .map_err(CliError::InvalidArgument)?;
        let search = self
            .search
            .clone()
            .filter(|q| !q.trim().is_empty());
        Ok(ConflictFilter {
            kind,
            severity,
            search,
        })
    }
}

impl CallableTrait for RelationshipsListCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let filter = self.filter()?;
        let board = board(&self.settings)?;
        let json = self.json;

        let all = common::block_on(async move {
            let pb = (!json).then(|| progress::loading_spinner("relationships"));
            let loaded = board.refresh().await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
            loaded
        })??;

        let matching = filter.apply(&all);
        if json {
            common::print_json(&matching)?;
            return Ok(());
        }

        println!("Relationships ({})", matching.len());
        println!("{}", render_counts(&count_by_type(&all)));
        if matching.is_empty() {
            eprintln!("{}", relationships_empty_message(&filter));
            return Ok(());
        }
        print!("{}", render_relationships(&matching));
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// relationships show
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem relationships show <ID> [--json]`
pub struct RelationshipsShowCommand {
    pub settings: Settings,
    pub id: String,
    pub json: bool,
}

impl RelationshipsShowCommand {
    pub fn new(settings: Settings, id: String, json: bool) -> Self {
        Self { settings, id, json }
    }
}

impl CallableTrait for RelationshipsShowCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = common::api_client(&self.settings)?;
        let conflict = common::block_on(client.get_conflict(&self.id))??;

        if self.json {
            common::print_json(&conflict)?;
        } else {
            print!("{}", render_relationship(&conflict));
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// relationships resolve / dismiss / reopen
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem relationships resolve|dismiss|reopen <ID>`
pub struct RelationshipsStatusCommand {
    pub settings: Settings,
    pub id: String,
    pub status: ConflictStatus,
}

impl RelationshipsStatusCommand {
    pub fn new(settings: Settings, id: String, status: ConflictStatus) -> Self {
        Self {
            settings,
            id,
            status,
        }
    }
}

impl CallableTrait for RelationshipsStatusCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let board = board(&self.settings)?;
        let id = self.id.clone();
        let status = self.status;

        let change = common::block_on(async move {
            let pb = progress::spinner(&format!("Marking {} as {}...", id, status));
            let res = board.set_status(&id, status).await;
            match &res {
                Ok(_) => pb.finish_and_clear(),
                Err(_) => progress::finish_error(&pb, "Status update failed"),
            }
            res
        })??;

        match change {
            StatusChange::Applied(conflict) => {
                eprintln!(
                    "{} {} is now {}",
                    progress::status_icon(&conflict.status.to_string()),
                    conflict.id,
                    conflict.status
                );
            }
            StatusChange::InFlight => {
                eprintln!("An update for {} is already in progress.", self.id);
            }
        }
        Ok(())
    }
}
