use crate::cli::dashboard::{load_dashboard, DashboardSnapshot};
use crate::cli::error::CliError;
use crate::cli::filters::ACTIVITY_EMPTY_MESSAGE;
use crate::cli::progress;
use crate::cli::store::Stores;
use crate::configuration::Settings;
use crate::console::commands::cli::common::{self, truncate};
use crate::console::commands::CallableTrait;

/// `legalmem dashboard [--json] [--watch]`
///
/// Overview stats plus recent activity. Individual backend failures leave
/// their numbers at zero and are listed as warnings; they never fail the view.
pub struct DashboardCommand {
    pub settings: Settings,
    pub json: bool,
    pub watch: bool,
}

impl DashboardCommand {
    pub fn new(settings: Settings, json: bool, watch: bool) -> Self {
        Self {
            settings,
            json,
            watch,
        }
    }
}

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let stats = &snapshot.stats;

    out.push_str("Legal Memory Dashboard\n");
    out.push_str(&format!("{}\n", "─".repeat(60)));
    out.push_str(&format!("{:<20} {}\n", "Total Documents", stats.total_documents));
    out.push_str(&format!("{:<20} {}\n", "Memory Queries", stats.memory_queries));
    out.push_str(&format!("{:<20} {}\n", "Conflicts Found", stats.conflicts_found));
    out.push_str(&format!("{:<20} {}\n", "Relationships", stats.relationships));

    out.push_str("\nRecent Activity\n");
    out.push_str(&format!("{}\n", "─".repeat(60)));
    if snapshot.recent_activity.is_empty() {
        out.push_str(ACTIVITY_EMPTY_MESSAGE);
        out.push('\n');
    } else {
        for change in &snapshot.recent_activity {
            out.push_str(&format!(
                "{:<20} {:<28} {}\n",
                change.display_time(),
                truncate(&change.document, 26),
                change.kind,
            ));
        }
    }

    out
}

impl CallableTrait for DashboardCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = common::api_client(&self.settings)?;
        let stores = Stores::default();
        let json = self.json;

        let render = || {
            let client = client.clone();
            let stores = stores.clone();
            async move {
                let pb = (!json).then(|| progress::loading_spinner("dashboard"));
                let snapshot = load_dashboard(&client, &stores).await;
                if let Some(pb) = pb {
                    pb.finish_and_clear();
                }

                if json {
                    common::print_json(&snapshot)?;
                } else {
                    print!("{}", render_dashboard(&snapshot));
                    for failure in &snapshot.failures {
                        eprintln!("Warning: {:?} unavailable ({})", failure.slice, failure.message);
                    }
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
