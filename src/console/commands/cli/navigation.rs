use crate::cli::routes::{Route, ROUTES};
use crate::configuration::Settings;
use crate::console::commands::cli::changes::{ChangeScope, ChangesCommand};
use crate::console::commands::cli::chat::ChatInteractiveCommand;
use crate::console::commands::cli::dashboard::DashboardCommand;
use crate::console::commands::cli::documents::DocumentsListCommand;
use crate::console::commands::cli::relationships::RelationshipsListCommand;
use crate::console::commands::CallableTrait;

/// `legalmem routes`
pub struct RoutesCommand;

pub fn render_routes() -> String {
    let mut out = format!("{:<15} {:<14} {}\n", "PATH", "VIEW", "DESCRIPTION");
    out.push_str(&format!("{}\n", "─".repeat(80)));
    for route in ROUTES {
        out.push_str(&format!(
            "{:<15} {:<14} {}\n",
            route.path(),
            route.label(),
            route.description()
        ));
    }
    out
}

impl CallableTrait for RoutesCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        print!("{}", render_routes());
        Ok(())
    }
}

/// `legalmem open <PATH>`: run the default command of the view at `PATH`.
pub struct OpenCommand {
    pub settings: Settings,
    pub path: String,
}

impl OpenCommand {
    pub fn new(settings: Settings, path: String) -> Self {
        Self { settings, path }
    }
}

pub fn view_command(route: Route, settings: Settings) -> Box<dyn CallableTrait> {
    match route {
        Route::Dashboard => Box::new(DashboardCommand::new(settings, false, false)),
        Route::Documents => Box::new(DocumentsListCommand::new(settings, None, None, false)),
        Route::LegalMemory => Box::new(ChatInteractiveCommand::new(settings, None)),
        Route::Relationships => Box::new(RelationshipsListCommand::new(
            settings, None, None, None, false,
        )),
        Route::Changes => Box::new(ChangesCommand::new(
            settings,
            ChangeScope::Recent,
            false,
            false,
        )),
    }
}

impl CallableTrait for OpenCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let route = Route::from_path(&self.path)?;
        tracing::debug!(path = route.path(), "opening view");
        view_command(route, self.settings.clone()).call()
    }
}
