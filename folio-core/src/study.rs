//! Study details and the session that owns them.
//!
//! Study details are an opaque key/value map supplied by the host. They only
//! seed template placeholders and generated content; nothing here validates
//! them. The [`StudySession`] is passed explicitly to whatever needs it and
//! persists through a pluggable [`StudyStorage`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EditorError, EditorResult};

/// Storage key the current study is saved under.
pub const STUDY_KEY: &str = "studyData";

/// Opaque study metadata (title, phase, eligibility, contact, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyDetails(BTreeMap<String, Value>);

impl StudyDetails {
    /// Empty study details.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Non-empty string value for `key`, trimmed.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// String items of an array value (or a single string) for `key`.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        }
    }

    /// True if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The study title, if present.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }
}

/// Backing store for the study session.
pub trait StudyStorage {
    /// Load the saved study, or `None` if nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns an error if saved data exists but cannot be read.
    fn load(&self) -> EditorResult<Option<StudyDetails>>;

    /// Save the study, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the study cannot be written.
    fn save(&mut self, study: &StudyDetails) -> EditorResult<()>;

    /// Forget the saved study.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved data cannot be removed.
    fn remove(&mut self) -> EditorResult<()>;
}

/// In-memory storage, for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    saved: Option<String>,
}

impl StudyStorage for MemoryStorage {
    fn load(&self) -> EditorResult<Option<StudyDetails>> {
        self.saved
            .as_deref()
            .map(serde_json::from_str::<StudyDetails>)
            .transpose()
            .map_err(EditorError::from)
    }

    fn save(&mut self, study: &StudyDetails) -> EditorResult<()> {
        self.saved = Some(serde_json::to_string(study)?);
        Ok(())
    }

    fn remove(&mut self) -> EditorResult<()> {
        self.saved = None;
        Ok(())
    }
}

/// Stores the study as a JSON file in a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage under `data_dir`. The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> EditorResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            path: data_dir.join(format!("{}.json", sanitize_filename(STUDY_KEY))),
        })
    }

    /// Path of the JSON file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl StudyStorage for FileStorage {
    fn load(&self) -> EditorResult<Option<StudyDetails>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let study = serde_json::from_str(&contents).map_err(|e| {
            EditorError::Storage(format!("{} is not a study: {e}", self.path.display()))
        })?;
        Ok(Some(study))
    }

    fn save(&mut self, study: &StudyDetails) -> EditorResult<()> {
        let json = serde_json::to_string_pretty(study)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn remove(&mut self) -> EditorResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// The current study, owned explicitly rather than read from ambient state.
#[derive(Debug)]
pub struct StudySession<S: StudyStorage> {
    storage: S,
    current: Option<StudyDetails>,
}

impl<S: StudyStorage> StudySession<S> {
    /// Open a session, loading any previously saved study.
    ///
    /// Unreadable saved data is logged and treated as no study.
    pub fn open(storage: S) -> Self {
        let current = match storage.load() {
            Ok(study) => study,
            Err(e) => {
                tracing::warn!("Ignoring unreadable saved study: {e}");
                None
            }
        };
        Self { storage, current }
    }

    /// The current study, if one is set.
    #[must_use]
    pub fn get(&self) -> Option<&StudyDetails> {
        self.current.as_ref()
    }

    /// The current study, or empty details.
    #[must_use]
    pub fn get_or_default(&self) -> StudyDetails {
        self.current.clone().unwrap_or_default()
    }

    /// Replace the current study and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails; the in-memory study is
    /// still updated.
    pub fn set(&mut self, study: StudyDetails) -> EditorResult<()> {
        let result = self.storage.save(&study);
        self.current = Some(study);
        result
    }

    /// Forget the current study.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be cleared.
    pub fn clear(&mut self) -> EditorResult<()> {
        self.current = None;
        self.storage.remove()
    }
}

/// Replace any character that is not alphanumeric, `-` or `_` with `_`.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
