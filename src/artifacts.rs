//! Temporary artifact management.
//!
//! Every intermediate file of a run (segment PDFs, outline dumps, header and
//! footer HTML, the TOC and watermark PDFs, the pre-watermark merge result) is
//! an *artifact*: a file inside a private per-run directory that is addressed
//! by an [`ArtifactId`]. The id is the only handle the pipeline passes around;
//! [`ArtifactManager::path`] regenerates the path from it.
//!
//! The manager also owns the removal invariant: it tracks the set of live ids,
//! [`ArtifactManager::remove`] clears membership exactly once, and
//! [`ArtifactManager::finish`] asserts (in debug builds) that a successful run
//! removed everything it allocated. On the error path
//! [`ArtifactManager::remove_all`] (and `Drop`) removes whatever is left.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{PdfBindError, Result};

/// Prefix of the per-run directory and of every artifact file name.
pub const ARTIFACT_PREFIX: &str = "H2P";

/// What an artifact holds; determines its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactKind {
    /// A PDF produced by the renderer or the merger.
    Pdf,
    /// An HTML snippet (headers and footers).
    Html,
    /// An XML outline dump.
    Outline,
}

impl ArtifactKind {
    /// File extension used for this kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Outline => "xml",
        }
    }
}

/// Opaque handle to a temporary artifact.
///
/// Ids are never zero and are unique within one [`ArtifactManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId {
    serial: NonZeroU32,
    kind: ArtifactKind,
}

impl ArtifactId {
    /// Numeric part of the id.
    pub fn serial(&self) -> u32 {
        self.serial.get()
    }

    /// Kind of the artifact.
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#X})", self.serial(), self.serial())
    }
}

/// Owner of all temporary files of a run.
#[derive(Debug)]
pub struct ArtifactManager {
    root: PathBuf,
    dir: Option<TempDir>,
    next_serial: u32,
    live: BTreeSet<ArtifactId>,
    keep_files: bool,
}

impl ArtifactManager {
    /// Create a manager whose private directory lives under `base`.
    ///
    /// With `keep_files` set, removed artifacts are only forgotten, not
    /// deleted, and the directory survives the run.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::TempFile`] if the directory cannot be created.
    pub fn new(base: &Path, keep_files: bool) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(ARTIFACT_PREFIX)
            .tempdir_in(base)
            .map_err(|err| {
                PdfBindError::temp_file(format!(
                    "cannot create directory in {}: {err}",
                    base.display()
                ))
            })?;
        let root = dir.path().to_path_buf();
        debug!(root = %root.display(), keep_files, "Created artifact directory");

        let dir = if keep_files {
            let _ = dir.keep();
            None
        } else {
            Some(dir)
        };

        Ok(Self {
            root,
            dir,
            next_serial: 0,
            live: BTreeSet::new(),
            keep_files,
        })
    }

    /// Directory holding this run's artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Allocate a new artifact and create it empty on disk.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::TempFile`] if the id space is exhausted or the
    /// file cannot be created.
    pub fn allocate(&mut self, kind: ArtifactKind) -> Result<ArtifactId> {
        let serial = self
            .next_serial
            .checked_add(1)
            .and_then(NonZeroU32::new)
            .ok_or_else(|| PdfBindError::temp_file("artifact ids exhausted"))?;
        self.next_serial = serial.get();

        let id = ArtifactId { serial, kind };
        let path = self.path(id);
        File::create(&path).map_err(|err| {
            PdfBindError::temp_file(format!("{}: {err}", path.display()))
        })?;

        self.live.insert(id);
        debug!(%id, path = %path.display(), "Allocated temp file");
        Ok(id)
    }

    /// Resolve an id to its path. Pure: works for removed ids as well.
    pub fn path(&self, id: ArtifactId) -> PathBuf {
        self.root.join(format!(
            "{ARTIFACT_PREFIX}{:04X}.{}",
            id.serial(),
            id.kind.extension()
        ))
    }

    /// Whether `id` is allocated and not yet removed.
    pub fn is_live(&self, id: ArtifactId) -> bool {
        self.live.contains(&id)
    }

    /// Number of live artifacts.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Remove an artifact. Returns false if it was not live.
    ///
    /// A file that cannot be deleted is logged and otherwise ignored; the id
    /// is forgotten either way.
    pub fn remove(&mut self, id: ArtifactId) -> bool {
        if !self.live.remove(&id) {
            warn!(%id, "Attempted to remove an artifact that is not live");
            return false;
        }

        let path = self.path(id);
        if self.keep_files {
            debug!(%id, path = %path.display(), "Keeping temp file");
            return true;
        }

        debug!(%id, path = %path.display(), "Removing temp file");
        if let Err(err) = std::fs::remove_file(&path) {
            warn!(path = %path.display(), error = %err, "Failed to remove temp file");
        }
        true
    }

    /// Remove every live artifact. Returns how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let ids: Vec<ArtifactId> = self.live.iter().copied().collect();
        for id in &ids {
            self.remove(*id);
        }
        ids.len()
    }

    /// Close the manager after a successful run.
    ///
    /// Every artifact must already have been removed; debug builds assert
    /// this, release builds remove the stragglers.
    pub fn finish(mut self) {
        debug_assert!(
            self.live.is_empty(),
            "artifacts still live at shutdown: {:?}",
            self.live
        );
        self.remove_all();
    }
}

impl Drop for ArtifactManager {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            self.remove_all();
        }
        if let Some(dir) = self.dir.take()
            && let Err(err) = dir.close()
        {
            warn!(root = %self.root.display(), error = %err, "Failed to remove artifact directory");
        }
    }
}
