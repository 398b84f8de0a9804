use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::Account;

/// Flat-file account store: a JSON array of [`Account`] records. Missing
/// file reads as an empty list; onboarding rewrites the whole array.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from("sessions/session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> AppResult<Vec<Account>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Session(format!("failed to parse {}: {}", self.path.display(), e)))
    }

    pub fn find(&self, name: &str, username: &str) -> AppResult<Option<Account>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|a| a.name == name && a.username == username))
    }

    pub fn add(&self, account: Account) -> AppResult<()> {
        let mut accounts = self.load()?;
        if accounts
            .iter()
            .any(|a| a.name == account.name && a.username == account.username)
        {
            return Err(AppError::Session(format!(
                "account {} ({}) already onboarded",
                account.name, account.username
            )));
        }
        accounts.push(account);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&accounts)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
