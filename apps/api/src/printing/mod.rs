//! Print dispatch. Failures here are never fatal to receipt generation: the document has
//! already been written, so the caller logs the error and reports `printed: false`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub document_path: PathBuf,
    pub copies: u32,
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Printing is disabled (PRINT_COMMAND not set)")]
    Disabled,

    #[error("Failed to start print command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Print command '{program}' exited with {status}")]
    Failed { program: String, status: String },
}

/// Sends a finished document to a printer.
#[async_trait]
pub trait PrintDispatcher: Send + Sync {
    async fn dispatch(&self, job: &PrintJob) -> Result<(), PrintError>;
}

/// Runs an external command built from a whitespace-separated template in which `{copies}`
/// and `{path}` are substituted per job, e.g.
/// `SumatraPDF.exe -print-to-default -print-settings {copies}x {path}` or
/// `lp -n {copies} {path}`.
#[derive(Debug, Clone)]
pub struct CommandPrinter {
    program: String,
    args: Vec<String>,
}

impl CommandPrinter {
    /// `None` for an empty template.
    pub fn from_template(template: &str) -> Option<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Arguments with the job's placeholders filled in.
    pub fn args_for(&self, job: &PrintJob) -> Vec<String> {
        let copies = job.copies.to_string();
        let path = job.document_path.display().to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{copies}", &copies).replace("{path}", &path))
            .collect()
    }
}

#[async_trait]
impl PrintDispatcher for CommandPrinter {
    async fn dispatch(&self, job: &PrintJob) -> Result<(), PrintError> {
        let status = Command::new(&self.program)
            .args(self.args_for(job))
            .status()
            .await
            .map_err(|source| PrintError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(PrintError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        info!(
            copies = job.copies,
            path = %job.document_path.display(),
            "Sent receipt to the printer"
        );
        Ok(())
    }
}

/// Used when no print command is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPrinter;

#[async_trait]
impl PrintDispatcher for DisabledPrinter {
    async fn dispatch(&self, job: &PrintJob) -> Result<(), PrintError> {
        debug!(path = %job.document_path.display(), "Printing disabled, document not sent");
        Err(PrintError::Disabled)
    }
}

/// Picks the dispatcher for an optional command template.
pub fn dispatcher_from_template(template: Option<&str>) -> Arc<dyn PrintDispatcher> {
    match template.and_then(CommandPrinter::from_template) {
        Some(printer) => Arc::new(printer),
        None => Arc::new(DisabledPrinter),
    }
}
