use dialoguer::Input;

use crate::cli::chat::{ChatConversation, EXAMPLE_QUERIES};
use crate::cli::error::CliError;
use crate::cli::filters::{filter_sessions, sessions_empty_message};
use crate::cli::progress;
use crate::cli::store::EntityStore;
use crate::configuration::Settings;
use crate::console::commands::cli::common::{self, truncate};
use crate::console::commands::CallableTrait;
use crate::models::{ChatMessage, ChatSession, Role};

pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "You",
        Role::Assistant => "Legal Memory",
    };
    let mut out = format!(
        "{} [{}]\n{}\n",
        speaker,
        message.display_time(),
        message.content
    );
    let sources = message.sources();
    if !sources.is_empty() {
        out.push_str("Sources:\n");
        for src in sources {
            match src.page {
                Some(page) => out.push_str(&format!(
                    "  - {} (p. {}, {:.0}% relevant)\n",
                    src.document,
                    page,
                    src.relevance * 100.0
                )),
                None => out.push_str(&format!(
                    "  - {} ({:.0}% relevant)\n",
                    src.document,
                    src.relevance * 100.0
                )),
            }
        }
    }
    out
}

pub fn render_sessions(sessions: &[&ChatSession]) -> String {
    let mut out = format!("{:<38} {:<30} {:<22} {}\n", "ID", "NAME", "CREATED", "LAST MESSAGE");
    out.push_str(&format!("{}\n", "─".repeat(120)));
    for s in sessions {
        out.push_str(&format!(
            "{:<38} {:<30} {:<22} {}\n",
            truncate(&s.id, 36),
            truncate(&s.name, 28),
            truncate(&s.created_at, 20),
            truncate(s.last_message.as_deref().unwrap_or("-"), 40),
        ));
    }
    out
}

fn prompt_error(err: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, err))
}

fn prompt_closed(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::Interrupted
    )
}

/// Next line from the prompt, `None` once input is closed (EOF or Ctrl-C).
fn read_line() -> Result<Option<String>, CliError> {
    match Input::<String>::new()
        .with_prompt("You")
        .allow_empty(true)
        .interact_text()
    {
        Ok(line) => Ok(Some(line)),
        Err(dialoguer::Error::IO(err)) if prompt_closed(&err) => Ok(None),
        Err(err) => Err(prompt_error(err)),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// chat ask
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem chat ask <MESSAGE> [--session ID]`
pub struct ChatAskCommand {
    pub settings: Settings,
    pub message: String,
    pub session: Option<String>,
}

impl ChatAskCommand {
    pub fn new(settings: Settings, message: String, session: Option<String>) -> Self {
        Self {
            settings,
            message,
            session,
        }
    }
}

impl CallableTrait for ChatAskCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.message.trim().is_empty() {
            return Err(Box::new(CliError::InvalidArgument(
                "message must not be empty".to_string(),
            )));
        }

        let client = common::api_client(&self.settings)?;
        let mut chat = ChatConversation::new(client, EntityStore::new());
        let session = self.session.clone();
        let message = self.message.clone();

        common::block_on(async move {
            if let Some(id) = &session {
                chat.open_session(id).await?;
            }

            let pb = progress::spinner("Searching legal memory...");
            let reply = chat.send(&message).await.cloned();
            pb.finish_and_clear();

            if let Some(reply) = reply {
                print!("{}", render_message(&reply));
            }
            if let Some(err) = chat.take_error() {
                return Err(CliError::Api(err));
            }
            if let Some(id) = chat.session_id() {
                eprintln!("Session: {}", id);
            }
            Ok::<(), CliError>(())
        })??;

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// chat sessions / messages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem chat sessions [--search Q] [--json]`
pub struct ChatSessionsCommand {
    pub settings: Settings,
    pub search: Option<String>,
    pub json: bool,
}

impl ChatSessionsCommand {
    pub fn new(settings: Settings, search: Option<String>, json: bool) -> Self {
        Self {
            settings,
            search,
            json,
        }
    }
}

impl CallableTrait for ChatSessionsCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = common::api_client(&self.settings)?;
        let sessions = common::block_on(client.chat_sessions())??;

        let search = self.search.as_deref().unwrap_or("");
        let matching = filter_sessions(&sessions, search);

        if self.json {
            common::print_json(&matching)?;
            return Ok(());
        }

        println!("Conversations ({})", matching.len());
        if matching.is_empty() {
            eprintln!("{}", sessions_empty_message(search));
            return Ok(());
        }
        print!("{}", render_sessions(&matching));
        Ok(())
    }
}

/// `legalmem chat messages <SESSION_ID> [--json]`
pub struct ChatMessagesCommand {
    pub settings: Settings,
    pub session_id: String,
    pub json: bool,
}

impl ChatMessagesCommand {
    pub fn new(settings: Settings, session_id: String, json: bool) -> Self {
        Self {
            settings,
            session_id,
            json,
        }
    }
}

impl CallableTrait for ChatMessagesCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = common::api_client(&self.settings)?;
        let messages = common::block_on(client.chat_messages(&self.session_id))??;

        if self.json {
            common::print_json(&messages)?;
            return Ok(());
        }

        if messages.is_empty() {
            eprintln!("No messages in this conversation yet.");
            return Ok(());
        }
        for message in &messages {
            println!("{}", render_message(message));
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// chat interactive
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem chat interactive [--session ID]`
///
/// Line-by-line conversation. `/new` starts a fresh session, `/sessions`
/// lists past ones, `/exit` or end of input quits.
pub struct ChatInteractiveCommand {
    pub settings: Settings,
    pub session: Option<String>,
}

impl ChatInteractiveCommand {
    pub fn new(settings: Settings, session: Option<String>) -> Self {
        Self { settings, session }
    }
}

fn print_examples() {
    println!("Ask anything about your legal documents, for example:");
    for query in EXAMPLE_QUERIES {
        println!("  • {}", query);
    }
    println!("Commands: /new, /sessions, /exit\n");
}

impl CallableTrait for ChatInteractiveCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = common::api_client(&self.settings)?;
        let mut chat = ChatConversation::new(client, EntityStore::new());
        let session = self.session.clone();

        common::block_on(async move {
            match &session {
                Some(id) => {
                    for message in chat.open_session(id).await? {
                        println!("{}", render_message(message));
                    }
                }
                None => print_examples(),
            }

            loop {
                let Some(line) = read_line()? else {
                    break;
                };

                match line.trim() {
                    "/exit" | "/quit" => break,
                    "/new" => {
                        chat.new_conversation();
                        print_examples();
                        continue;
                    }
                    "/sessions" => {
                        match chat.refresh_sessions().await {
                            Ok(sessions) => {
                                let all: Vec<&ChatSession> = sessions.iter().collect();
                                if all.is_empty() {
                                    println!("{}", sessions_empty_message(""));
                                } else {
                                    print!("{}", render_sessions(&all));
                                }
                            }
                            Err(err) => eprintln!("Error: {}", err),
                        }
                        continue;
                    }
                    _ => {}
                }

                let pb = progress::spinner("Searching legal memory...");
                let reply = chat.send(&line).await.cloned();
                pb.finish_and_clear();
                if let Some(reply) = reply {
                    println!("{}", render_message(&reply));
                }
            }
            Ok::<(), CliError>(())
        })??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceCitation;

    #[test]
    fn test_render_message_lists_sources() {
        let mut message = ChatMessage::local_assistant("The cap is 12 months of fees.");
        message.sources = Some(vec![
            SourceCitation {
                document: "Master Service Agreement".to_string(),
                page: Some(4),
                relevance: 0.92,
            },
            SourceCitation {
                document: "SOW - Q4 Project".to_string(),
                page: None,
                relevance: 0.5,
            },
        ]);
        let out = render_message(&message);
        assert!(out.starts_with("Legal Memory"));
        assert!(out.contains("Master Service Agreement (p. 4, 92% relevant)"));
        assert!(out.contains("SOW - Q4 Project (50% relevant)"));
    }

    #[test]
    fn test_render_user_message_has_no_sources_block() {
        let out = render_message(&ChatMessage::user("hello"));
        assert!(out.starts_with("You"));
        assert!(!out.contains("Sources:"));
    }

    #[test]
    fn test_eof_and_interrupt_close_the_prompt() {
        use std::io::{Error, ErrorKind};
        assert!(prompt_closed(&Error::new(ErrorKind::UnexpectedEof, "eof")));
        assert!(prompt_closed(&Error::new(ErrorKind::Interrupted, "ctrl-c")));
        assert!(!prompt_closed(&Error::new(ErrorKind::PermissionDenied, "tty")));
    }

    #[test]
    fn test_render_sessions_uses_dash_for_missing_preview() {
        let session = ChatSession {
            id: "s1".to_string(),
            name: "Liability caps".to_string(),
            created_at: "2024-03-01".to_string(),
            last_message: None,
            message_count: None,
        };
        let out = render_sessions(&[&session]);
        assert!(out.contains("Liability caps"));
        assert!(out.contains(" -"));
    }
}
