//! Persisted "last used receipt number".
//!
//! A confirmed number is stored as-is, even when it is lower than the stored value: the
//! person filling the form may override the suggestion to re-issue an older receipt.
//! Regressions are logged, not prevented.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::store::{read_json, write_json_atomic};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CounterRecord {
    #[serde(default)]
    latest_receipt_number: u64,
}

#[derive(Debug, Clone)]
pub struct ReceiptCounter {
    path: PathBuf,
}

impl ReceiptCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last confirmed number; 0 when nothing has been issued yet.
    pub fn latest(&self) -> Result<u64> {
        Ok(read_json::<CounterRecord>(&self.path)?
            .unwrap_or_default()
            .latest_receipt_number)
    }

    /// Number to pre-fill on the next form.
    pub fn suggest_next(&self) -> Result<u64> {
        Ok(self.latest()?.saturating_add(1))
    }

    /// Records `number` as the latest issued receipt.
    pub fn commit(&self, number: u64) -> Result<()> {
        let previous = self.latest().unwrap_or(0);
        if number < previous {
            warn!(
                previous,
                confirmed = number,
                "Receipt counter moved backwards"
            );
        }
        write_json_atomic(
            &self.path,
            &CounterRecord {
                latest_receipt_number: number,
            },
        )?;
        info!(latest_receipt_number = number, "Receipt counter updated");
        Ok(())
    }
}
