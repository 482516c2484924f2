//! Batch loader
//!
//! Walks a source root and executes every regular file in it, whatever its
//! extension, into one [`LuaSession`].

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::error::{LuaError, LuaResult};
use crate::session::LuaSession;
use crate::types::{ExecutionOutcome, SourceUnit};

/// What to do when a file fails both as a chunk and as a wrapped function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failing file and stop the batch
    #[default]
    Abort,
    /// Log the failing file, record it, and keep loading
    Continue,
}

/// A file that could not be loaded
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Summary of one loading pass
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub files: usize,
    pub chunks: usize,
    pub fallbacks: usize,
    pub failures: Vec<LoadFailure>,
    /// Globals discovered during this pass, duplicates included
    pub discovered: usize,
}

impl LoadReport {
    pub fn loaded(&self) -> usize {
        self.chunks + self.fallbacks
    }
}

/// Enumerates and executes the sources under one root directory
#[derive(Debug, Clone)]
pub struct BatchLoader {
    root: PathBuf,
    policy: FailurePolicy,
}

impl BatchLoader {
    /// Create a loader; the root must exist
    pub fn new(root: impl Into<PathBuf>) -> LuaResult<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(LuaError::SourceRootMissing(root));
        }
        Ok(Self {
            root,
            policy: FailurePolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Every regular file under the root, in traversal order.
    ///
    /// Entries are visited depth-first and sorted by file name within each
    /// directory; symlinks are not followed.
    pub fn sources(&self) -> LuaResult<Vec<SourceUnit>> {
        let mut units = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() {
                units.push(SourceUnit::new(entry.into_path()));
            }
        }
        debug!("Found {} source files under {}", units.len(), self.root.display());
        Ok(units)
    }

    /// Discover and load every source into `session`
    pub fn load_all(&self, session: &mut LuaSession) -> LuaResult<LoadReport> {
        if session.is_loaded() {
            debug!("Session already loaded, skipping {}", self.root.display());
            return Ok(LoadReport::default());
        }
        let units = self.sources()?;
        self.load_units(session, &units, |_| {})
    }

    /// Load the given units, calling `on_file` after each one is attempted
    pub fn load_units<F>(
        &self,
        session: &mut LuaSession,
        units: &[SourceUnit],
        mut on_file: F,
    ) -> LuaResult<LoadReport>
    where
        F: FnMut(&SourceUnit),
    {
        if session.is_loaded() {
            debug!("Session already loaded, skipping {}", self.root.display());
            return Ok(LoadReport::default());
        }

        info!("Loading {} files from {}", units.len(), self.root.display());
        let mut report = LoadReport::default();

        for unit in units {
            report.files += 1;
            match session.execute(unit) {
                Ok(execution) => {
                    match execution.outcome {
                        ExecutionOutcome::Chunk => report.chunks += 1,
                        ExecutionOutcome::Fallback => report.fallbacks += 1,
                    }
                    report.discovered += execution.new_names.len();
                }
                Err(e) => match self.policy {
                    FailurePolicy::Abort => {
                        error!("Failed to load {}: {}", unit.path.display(), e);
                        return Err(e);
                    }
                    FailurePolicy::Continue => {
                        warn!("Skipping {}: {}", unit.path.display(), e);
                        report.failures.push(LoadFailure {
                            path: unit.path.clone(),
                            error: e.to_string(),
                        });
                    }
                },
            }
            on_file(unit);
        }

        session.mark_loaded();
        info!(
            "Loaded {} of {} files ({} via fallback, {} failed), {} globals discovered",
            report.loaded(),
            report.files,
            report.fallbacks,
            report.failures.len(),
            report.discovered
        );
        Ok(report)
    }
}
