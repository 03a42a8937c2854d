//! Saved customer names, kept sorted.
//!
//! A missing or unreadable file is replaced by an empty list instead of failing: the list
//! is a convenience, not a record anyone depends on.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::receipt::naming::find_forbidden;
use crate::store::{read_json, write_json_atomic};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CustomerRecord {
    #[serde(default)]
    customers: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Customer name cannot be empty")]
    Empty,

    #[error("Character '{0}' is not allowed in customer names")]
    ForbiddenCharacter(char),

    #[error("Customer '{0}' already exists")]
    Duplicate(String),

    #[error("Customer '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub struct CustomerStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl CustomerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Current list, healing a missing or corrupt file.
    pub fn list(&self) -> Vec<String> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.load()
    }

    pub fn add(&self, name: &str) -> Result<Vec<String>, CustomerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CustomerError::Empty);
        }
        if let Some(ch) = find_forbidden(name) {
            return Err(CustomerError::ForbiddenCharacter(ch));
        }

        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut customers = self.load();
        if customers.iter().any(|c| c == name) {
            return Err(CustomerError::Duplicate(name.to_string()));
        }
        customers.push(name.to_string());
        customers.sort();
        self.save(&customers)?;
        info!(customer = name, total = customers.len(), "Customer added");
        Ok(customers)
    }

    pub fn remove(&self, name: &str) -> Result<Vec<String>, CustomerError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut customers = self.load();
        let index = customers
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CustomerError::NotFound(name.to_string()))?;
        customers.remove(index);
        customers.sort();
        self.save(&customers)?;
        info!(customer = name, total = customers.len(), "Customer removed");
        Ok(customers)
    }

    fn load(&self) -> Vec<String> {
        match read_json::<CustomerRecord>(&self.path) {
            Ok(Some(record)) => record.customers,
            Ok(None) => {
                self.reset("missing");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Customer list unreadable");
                self.reset("corrupt");
                Vec::new()
            }
        }
    }

    fn reset(&self, reason: &str) {
        if let Err(e) = self.save(&[]) {
            warn!(path = %self.path.display(), reason, error = %e, "Failed to reset customer list");
        }
    }

    fn save(&self, customers: &[String]) -> anyhow::Result<()> {
        write_json_atomic(
            &self.path,
            &CustomerRecord {
                customers: customers.to_vec(),
            },
        )
    }
}
