//! Template cache for templates stored on disk

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

/// Errors that can occur while loading templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file does not exist
    #[error("template file not found: {path}")]
    NotFound { path: PathBuf },

    /// Template file exists but could not be read
    #[error("error reading template file {path}: {message}")]
    Read { path: PathBuf, message: String },
}

/// Template text keyed by path, read from disk on first use
#[derive(Debug, Default)]
pub struct TemplateCache {
    templates: HashMap<PathBuf, String>,
    /// Base path for resolving relative file paths
    base_path: Option<PathBuf>,
}

impl TemplateCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new cache resolving relative paths against `base_path`
    pub fn with_base_path(base_path: PathBuf) -> Self {
        Self {
            templates: HashMap::new(),
            base_path: Some(base_path),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Template text for `path`, reading the file only the first time
    pub fn load(&mut self, path: &Path) -> Result<&str, TemplateError> {
        let path = self.resolve(path);
        match self.templates.entry(path) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_str()),
            Entry::Vacant(entry) => {
                let text = read_template(entry.key())?;
                debug!("Loaded template {}", entry.key().display());
                Ok(entry.insert(text).as_str())
            }
        }
    }

    /// Store template text under `path` without touching the filesystem
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let path = self.resolve(&path.into());
        self.templates.insert(path, text.into());
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.templates.get(&self.resolve(path)).map(String::as_str)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.templates.contains_key(&self.resolve(path))
    }

    /// Drop one cached template so the next load rereads it
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let path = self.resolve(path);
        self.templates.remove(&path).is_some()
    }

    pub fn clear(&mut self) {
        self.templates.clear();
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn read_template(path: &Path) -> Result<String, TemplateError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TemplateError::NotFound {
            path: path.to_path_buf(),
        },
        _ => TemplateError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })
}
