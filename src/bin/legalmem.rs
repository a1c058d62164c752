//! `legalmem` terminal client for the Legal Memory backend.
//!
//! ```text
//! legalmem dashboard
//! legalmem documents upload contract.pdf policy.docx
//! legalmem chat ask "Have we agreed to a liability cap like this before?"
//! legalmem relationships list --type conflict --severity high
//! legalmem open /changes
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use legalmem::configuration::{get_configuration, Settings};
use legalmem::console::commands::cli::{
    changes, chat, dashboard, documents, health, navigation, relationships,
};
use legalmem::console::commands::CallableTrait;
use legalmem::models::ConflictStatus;
use legalmem::telemetry::{get_subscriber, init_subscriber};

#[derive(Parser, Debug)]
#[command(
    name = "legalmem",
    version,
    about = "Track, recall, and reason across your legal documents",
    long_about = "Legal Memory client\n\n\
        Upload contracts, policies and memos, ask questions across them,\n\
        and review the conflicts and relationships the backend detects."
)]
struct Cli {
    /// Backend base URL (overrides configuration and LEGALMEM_API__BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Overview stats and recent activity
    Dashboard {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Re-render periodically until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Upload and manage legal documents
    Documents {
        #[command(subcommand)]
        command: DocumentsCommands,
    },
    /// Ask questions across all documents
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },
    /// Conflicts, similarities, references and precedents between documents
    Relationships {
        #[command(subcommand)]
        command: RelationshipsCommands,
    },
    /// Document and clause change history
    Changes {
        #[command(subcommand)]
        command: ChangesCommands,
    },
    /// Check that the backend is reachable
    Health {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List the available views
    Routes,
    /// Open the view at a path (e.g. /documents)
    Open {
        /// View path, as listed by `legalmem routes`
        path: String,
    },
}

#[derive(Debug, Subcommand)]
enum DocumentsCommands {
    /// List documents
    List {
        /// Case-insensitive match on the document name
        #[arg(long)]
        search: Option<String>,
        /// Document type: contract, policy, memo
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Upload PDF or DOCX files and follow their processing
    Upload {
        /// Files to upload; other file types are skipped
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
        /// Return right after the upload instead of following processing
        #[arg(long)]
        no_watch: bool,
    },
    /// Show one document
    Show {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show a document's processing status
    Status { id: String },
    /// Delete a document
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum ChatCommands {
    /// Ask a single question
    Ask {
        message: String,
        /// Continue an existing session
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },
    /// List past conversations
    Sessions {
        /// Case-insensitive match on name or last message
        #[arg(long)]
        search: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show a conversation's messages
    Messages {
        session_id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive conversation
    Interactive {
        /// Continue an existing session
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum RelationshipsCommands {
    /// List detected relationships
    List {
        /// conflict, similarity, reference, precedent
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,
        /// high, medium, low
        #[arg(long)]
        severity: Option<String>,
        /// Case-insensitive match on description and document names
        #[arg(long)]
        search: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show one relationship
    Show {
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Mark a relationship resolved
    Resolve { id: String },
    /// Dismiss a relationship
    Dismiss { id: String },
    /// Mark a relationship active again
    Reopen { id: String },
}

#[derive(Debug, Subcommand)]
enum ChangesCommands {
    /// Most recent changes across all documents
    Recent {
        #[arg(long)]
        json: bool,
        #[arg(long)]
        watch: bool,
    },
    /// History of one clause
    Clause {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Changes to one document
    Document {
        id: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = match load_settings(cli.api_url.clone()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let subscriber = get_subscriber("legalmem".into(), settings.log_level.clone(), std::io::stderr);
    init_subscriber(subscriber);

    let command = get_command(cli.command, settings);
    if let Err(err) = command.call() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn load_settings(api_url: Option<String>) -> Result<Settings, config::ConfigError> {
    let mut settings = get_configuration()?;
    if let Some(url) = api_url {
        settings.api.base_url = url;
    }
    Ok(settings)
}

fn get_command(command: Commands, settings: Settings) -> Box<dyn CallableTrait> {
    match command {
        Commands::Dashboard { json, watch } => {
            Box::new(dashboard::DashboardCommand::new(settings, json, watch))
        }
        Commands::Documents { command } => match command {
            DocumentsCommands::List { search, kind, json } => Box::new(
                documents::DocumentsListCommand::new(settings, search, kind, json),
            ),
            DocumentsCommands::Upload { files, no_watch } => Box::new(
                documents::DocumentsUploadCommand::new(settings, files, no_watch),
            ),
            DocumentsCommands::Show { id, json } => {
                Box::new(documents::DocumentsShowCommand::new(settings, id, json))
            }
            DocumentsCommands::Status { id } => {
                Box::new(documents::DocumentsStatusCommand::new(settings, id))
            }
            DocumentsCommands::Delete { id } => {
                Box::new(documents::DocumentsDeleteCommand::new(settings, id))
            }
        },
        Commands::Chat { command } => match command {
            ChatCommands::Ask { message, session } => {
                Box::new(chat::ChatAskCommand::new(settings, message, session))
            }
            ChatCommands::Sessions { search, json } => {
                Box::new(chat::ChatSessionsCommand::new(settings, search, json))
            }
            ChatCommands::Messages { session_id, json } => {
                Box::new(chat::ChatMessagesCommand::new(settings, session_id, json))
            }
            ChatCommands::Interactive { session } => {
                Box::new(chat::ChatInteractiveCommand::new(settings, session))
            }
        },
        Commands::Relationships { command } => match command {
            RelationshipsCommands::List {
                kind,
                severity,
                search,
                json,
            } => Box::new(relationships::RelationshipsListCommand::new(
                settings, kind, severity, search, json,
            )),
            RelationshipsCommands::Show { id, json } => Box::new(
                relationships::RelationshipsShowCommand::new(settings, id, json),
            ),
            RelationshipsCommands::Resolve { id } => Box::new(
                relationships::RelationshipsStatusCommand::new(settings, id, ConflictStatus::Resolved),
            ),
            RelationshipsCommands::Dismiss { id } => Box::new(
                relationships::RelationshipsStatusCommand::new(settings, id, ConflictStatus::Dismissed),
            ),
            RelationshipsCommands::Reopen { id } => Box::new(
                relationships::RelationshipsStatusCommand::new(settings, id, ConflictStatus::Active),
            ),
        },
        Commands::Changes { command } => match command {
            ChangesCommands::Recent { json, watch } => Box::new(changes::ChangesCommand::new(
                settings,
                changes::ChangeScope::Recent,
                json,
                watch,
            )),
            ChangesCommands::Clause { id, json } => Box::new(changes::ChangesCommand::new(
                settings,
                changes::ChangeScope::Clause(id),
                json,
                false,
            )),
            ChangesCommands::Document { id, json } => Box::new(changes::ChangesCommand::new(
                settings,
                changes::ChangeScope::Document(id),
                json,
                false,
            )),
        },
        Commands::Health { json } => Box::new(health::HealthCommand::new(settings, json)),
        Commands::Routes => Box::new(navigation::RoutesCommand),
        Commands::Open { path } => Box::new(navigation::OpenCommand::new(settings, path)),
    }
}
