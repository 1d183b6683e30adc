//! Runtime configuration for the plate form.

use crate::core::converter::LetterTable;
use crate::core::types::CompletenessPolicy;
use crate::error::{PlateError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a validation notice stays on screen unless configured.
pub const DEFAULT_NOTICE_TIMEOUT_MS: u64 = 3000;

/// Settings read from a JSON file. Every field has a default, so `{}` is a
/// valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    /// Completeness rule applied on search submission.
    pub policy: CompletenessPolicy,
    /// Arabic/Latin letter table in use.
    pub letter_table: LetterTable,
    /// Lifetime of the validation notice and field error markers.
    pub notice_timeout_ms: u64,
    /// Vehicle records (JSON array). The built-in demo set is used when unset.
    pub registry_path: Option<PathBuf>,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            policy: CompletenessPolicy::default(),
            letter_table: LetterTable::default(),
            notice_timeout_ms: DEFAULT_NOTICE_TIMEOUT_MS,
            registry_path: None,
        }
    }
}

impl PlateConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| PlateError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CompletenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_letter_table(mut self, table: LetterTable) -> Self {
        self.letter_table = table;
        self
    }

    pub fn notice_timeout(&self) -> Duration {
        Duration::from_millis(self.notice_timeout_ms)
    }
}
