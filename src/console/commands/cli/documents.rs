use std::path::PathBuf;

use futures::future::join_all;
use indicatif::{MultiProgress, ProgressBar};

use crate::cli::documents::DocumentLibrary;
use crate::cli::error::CliError;
use crate::cli::filters::{documents_empty_message, DocumentFilter};
use crate::cli::progress;
use crate::cli::scope::ViewScope;
use crate::cli::store::EntityStore;
use crate::cli::upload::{partition_accepted, PollOutcome, UploadFile};
use crate::configuration::Settings;
use crate::console::commands::cli::common::{self, truncate};
use crate::console::commands::CallableTrait;
use crate::models::{Document, DocumentType};

fn library(settings: &Settings) -> Result<DocumentLibrary, CliError> {
    Ok(DocumentLibrary::new(
        common::api_client(settings)?,
        EntityStore::new(),
    ))
}

pub fn render_documents(documents: &[Document]) -> String {
    let mut out = format!(
        "{:<38} {:<32} {:<9} {:<10} {:<12} {:<10}\n",
        "ID", "NAME", "TYPE", "SIZE", "UPLOADED", "STATUS"
    );
    out.push_str(&format!("{}\n", "─".repeat(116)));
    for d in documents {
        out.push_str(&format!(
            "{:<38} {:<32} {:<9} {:<10} {:<12} {} {}\n",
            truncate(&d.id, 36),
            truncate(&d.name, 30),
            d.kind,
            truncate(&d.size, 10),
            truncate(&d.upload_date, 12),
            progress::status_icon(&d.status.to_string()),
            d.status,
        ));
    }
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// documents list
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem documents list [--search Q] [--type T] [--json]`
pub struct DocumentsListCommand {
    pub settings: Settings,
    pub search: Option<String>,
    pub kind: Option<String>,
    pub json: bool,
}

impl DocumentsListCommand {
    pub fn new(settings: Settings, search: Option<String>, kind: Option<String>, json: bool) -> Self {
        Self {
            settings,
            search,
            kind,
            json,
        }
    }
}

impl CallableTrait for DocumentsListCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let kind = self
            .kind
            .as_deref()
            .map(str::parse::<DocumentType>)
            .transpose()
            .map_err(CliError::InvalidArgument)?;
        let filter = DocumentFilter {
            search: self.search.clone(),
            kind,
        };
        let library = library(&self.settings)?;
        let json = self.json;

        common::block_on(async move {
            let pb = (!json).then(|| progress::loading_spinner("documents"));
            let loaded = library.refresh().await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
            loaded?;

            let documents = library.filtered(&filter).await;
            if json {
                return common::print_json(&documents);
            }

            println!("Documents ({})", documents.len());
            if documents.is_empty() {
                eprintln!("{}", documents_empty_message(&filter));
                return Ok(());
            }
            print!("{}", render_documents(&documents));
            Ok::<(), CliError>(())
        })??;

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// documents upload
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem documents upload <FILE>... [--no-watch]`
///
/// Uploads the PDF/DOCX files among `files` in one request, then follows each
/// document's processing status until it settles (unless `--no-watch`).
pub struct DocumentsUploadCommand {
    pub settings: Settings,
    pub files: Vec<PathBuf>,
    pub watch: bool,
}

impl DocumentsUploadCommand {
    pub fn new(settings: Settings, files: Vec<PathBuf>, no_watch: bool) -> Self {
        Self {
            settings,
            files,
            watch: !no_watch,
        }
    }
}

fn finish_poll(pb: &ProgressBar, name: &str, outcome: &PollOutcome) {
    match outcome {
        PollOutcome::Ready => progress::finish_success(pb, &format!("{name}: ready")),
        PollOutcome::Failed => progress::finish_error(pb, &format!("{name}: processing failed")),
        PollOutcome::Exhausted { attempts } => progress::finish_neutral(
            pb,
            &format!("{name}: still processing after {attempts} checks"),
        ),
        PollOutcome::Aborted(_) => {
            progress::finish_neutral(pb, &format!("{name}: status unavailable"))
        }
        PollOutcome::Cancelled => progress::finish_neutral(pb, &format!("{name}: stopped watching")),
    }
}

impl CallableTrait for DocumentsUploadCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let library = library(&self.settings)?;
        let poll = self.settings.polling;
        let watch = self.watch;
        let paths = self.files.clone();

        common::block_on(async move {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                files.push(UploadFile::from_path(path).await?);
            }

            let (accepted, rejected) = partition_accepted(files);
            for file in &rejected {
                eprintln!("Skipping {} (only PDF and DOCX are supported)", file.file_name);
            }
            if accepted.is_empty() {
                return Err(CliError::NoAcceptedFiles {
                    rejected: rejected.iter().map(|f| PathBuf::from(&f.file_name)).collect(),
                });
            }

            let scope = ViewScope::new();
            let uploader = library.uploader(poll, scope.token());

            let pb = progress::spinner(&format!("Uploading {} file(s)...", accepted.len()));
            let batch = match uploader.upload(accepted).await {
                Ok(batch) => {
                    progress::finish_success(&pb, &format!("Uploaded {} document(s)", batch.documents.len()));
                    batch
                }
                Err(err) => {
                    progress::finish_error(&pb, "Upload failed");
                    return Err(err.into());
                }
            };
            print!("{}", render_documents(&batch.documents));

            if !watch || batch.polls.is_empty() {
                return Ok(());
            }

            let multi = MultiProgress::new();
            let ids: Vec<String> = batch.polls.iter().map(|p| p.document_id.clone()).collect();
            let summary = progress::processing_summary(&multi, ids.len());
            let mut revisions = library.store().subscribe();
            let tracker = async {
                while revisions.changed().await.is_ok() {
                    let settled = library.settled(&ids).await;
                    summary.set_message(format!("{}/{} processed", settled, ids.len()));
                }
            };

            let waits = batch.polls.into_iter().map(|poll| {
                let name = batch
                    .documents
                    .iter()
                    .find(|d| d.id == poll.document_id)
                    .map(|d| d.name.clone())
                    .unwrap_or_else(|| poll.document_id.clone());
                let pb = progress::processing_spinner(&multi, &name);
                async move {
                    let outcome = poll.outcome().await;
                    finish_poll(&pb, &name, &outcome);
                    outcome
                }
            });

            tokio::select! {
                _ = join_all(waits) => {}
                _ = tracker => {}
                _ = tokio::signal::ctrl_c() => {
                    scope.cancel();
                    eprintln!("Stopped watching; processing continues on the server.");
                }
            }
            let settled = library.settled(&ids).await;
            summary.finish_with_message(format!("{}/{} processed", settled, ids.len()));
            Ok::<(), CliError>(())
        })??;

        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// documents show / status / delete
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `legalmem documents show <ID> [--json]`
pub struct DocumentsShowCommand {
    pub settings: Settings,
    pub id: String,
    pub json: bool,
}

impl DocumentsShowCommand {
    pub fn new(settings: Settings, id: String, json: bool) -> Self {
        Self { settings, id, json }
    }
}

impl CallableTrait for DocumentsShowCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = common::api_client(&self.settings)?;
        let doc = common::block_on(client.get_document(&self.id))??;

        if self.json {
            common::print_json(&doc)?;
            return Ok(());
        }

        println!("{}", doc.name);
        println!("  id:        {}", doc.id);
        println!("  type:      {}", doc.kind);
        println!("  size:      {}", doc.size);
        println!("  uploaded:  {}", doc.upload_date);
        println!("  status:    {} {}", progress::status_icon(&doc.status.to_string()), doc.status);
        if let Some(url) = &doc.url {
            println!("  url:       {}", url);
        }
        Ok(())
    }
}

/// `legalmem documents status <ID>`
pub struct DocumentsStatusCommand {
    pub settings: Settings,
    pub id: String,
}

impl DocumentsStatusCommand {
    pub fn new(settings: Settings, id: String) -> Self {
        Self { settings, id }
    }
}

impl CallableTrait for DocumentsStatusCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let client = common::api_client(&self.settings)?;
        let report = common::block_on(client.document_status(&self.id))??;

        match report.progress {
            Some(pct) => println!("{} ({:.0}%)", report.status, pct),
            None => println!("{}", report.status),
        }
        Ok(())
    }
}

/// `legalmem documents delete <ID>`
pub struct DocumentsDeleteCommand {
    pub settings: Settings,
    pub id: String,
}

impl DocumentsDeleteCommand {
    pub fn new(settings: Settings, id: String) -> Self {
        Self { settings, id }
    }
}

impl CallableTrait for DocumentsDeleteCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let library = library(&self.settings)?;
        common::block_on(library.delete(&self.id))??;
        eprintln!("Deleted document {}.", self.id);
        Ok(())
    }
}
