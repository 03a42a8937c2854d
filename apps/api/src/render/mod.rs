//! Rendering collaborator: turns a composed receipt into one document file.
//!
//! Renderers are synchronous and may block on the filesystem; async callers run them
//! inside `spawn_blocking`.

pub mod svg;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::layout::{LayoutPlan, PageConfig};

pub use self::svg::{SvgReceiptRenderer, SvgRenderConfig};

/// Static content at the top of every receipt.
#[derive(Debug, Clone, Serialize)]
pub struct HeaderMetadata {
    pub title: String,
    pub contact_lines: Vec<String>,
    /// Drawn in place of the logo when no logo asset is available.
    pub logo_placeholder: String,
}

/// Everything a renderer needs for one page.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSpec {
    pub header: HeaderMetadata,
    pub page: PageConfig,
    pub plan: LayoutPlan,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write document {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait ReceiptRenderer: Send + Sync {
    /// File extension of produced documents, without the dot.
    fn extension(&self) -> &'static str;

    /// Writes the document to `path`, creating parent directories as needed.
    fn render(&self, document: &DocumentSpec, path: &Path) -> Result<(), RenderError>;
}
