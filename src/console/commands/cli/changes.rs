use crate::cli::error::CliError;
use crate::cli::filters::CHANGES_EMPTY_MESSAGE;
use crate::cli::progress;
use crate::configuration::Settings;
use crate::console::commands::cli::common::{self, truncate};
use crate::console::commands::CallableTrait;
use crate::models::Change;

/// Which slice of the change history to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeScope {
    Recent,
    Clause(String),
    Document(String),
}

impl ChangeScope {
    fn title(&self) -> String {
        match self {
            Self::Recent => "Recent changes".to_string(),
            Self::Clause(id) => format!("History of clause {id}"),
            Self::Document(id) => format!("Changes to document {id}"),
        }
    }
}

pub fn render_changes(changes: &[Change]) -> String {
    let mut out = String::new();
    for change in changes {
        out.push_str(&format!(
            "{:<20} {:<18} {}\n",
            change.display_time(),
            change.kind,
            truncate(&change.document, 40),
        ));
        out.push_str(&format!("{:<20} {}", "", change.description));
        if let Some(user) = &change.user {
            out.push_str(&format!(" (by {user})"));
        }
        out.push('\n');
    }
    out
}

/// `legalmem changes recent|clause <ID>|document <ID> [--json] [--watch]`
pub struct ChangesCommand {
    pub settings: Settings,
    pub scope: ChangeScope,
    pub json: bool,
    pub watch: bool,
}

impl ChangesCommand {
    pub fn new(settings: Settings, scope: ChangeScope, json: bool, watch: bool) -> Self {
        Self {
            settings,
            scope,
            json,
            watch,
        }
    }
}

impl CallableTrait for ChangesCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = common::api_client(&self.settings)?;
        let json = self.json;
        let scope = &self.scope;

        let render = || {
            let client = client.clone();
            async move {
                let pb = (!json).then(|| progress::loading_spinner("changes"));
                let loaded = match scope {
                    ChangeScope::Recent => client.recent_changes().await,
                    ChangeScope::Clause(id) => client.clause_history(id).await,
                    ChangeScope::Document(id) => client.document_changes(id).await,
                };
                if let Some(pb) = pb {
                    pb.finish_and_clear();
                }
                let changes = loaded?;

                if json {
                    return common::print_json(&changes);
                }
                println!("{} ({})", scope.title(), changes.len());
                if changes.is_empty() {
                    eprintln!("{}", CHANGES_EMPTY_MESSAGE);
                } else {
                    print!("{}", render_changes(&changes));
                }
                Ok::<(), CliError>(())
            }
        };

        if self.watch {
            common::block_on(common::watch_loop(common::WATCH_INTERVAL, render))??;
        } else {
            common::block_on(render())??;
        }
        Ok(())
    }
}
