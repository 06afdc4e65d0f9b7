//! PDF Store
//!
//! Files live under `<upload_dir>/pdfs/books` and `<upload_dir>/pdfs/chapters`
//! with generated names `<kind>-<stem>-<uuid>.pdf`. The database keeps the
//! path relative to the upload directory.
//!
//! Writes go through [`PdfWriter`], which counts bytes as they arrive and
//! refuses to grow a file past the limit. An aborted or dropped writer leaves
//! nothing behind.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Which entity a PDF belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfKind {
    Book,
    Chapter,
}

impl PdfKind {
    fn dir(self) -> &'static str {
        match self {
            PdfKind::Book => "pdfs/books",
            PdfKind::Chapter => "pdfs/chapters",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            PdfKind::Book => "book",
            PdfKind::Chapter => "chapter",
        }
    }
}

/// Errors raised while writing a PDF
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("file exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A PDF that has been fully written
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPdf {
    /// Path relative to the upload directory
    pub relative_path: String,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Client-supplied file name, sanitized
    pub file_name: String,
    /// Size in bytes
    pub size: u64,
}

/// Root of the PDF storage tree
#[derive(Debug, Clone)]
pub struct PdfStore {
    root: Arc<PathBuf>,
}

impl PdfStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directories if missing
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for kind in [PdfKind::Book, PdfKind::Chapter] {
            fs::create_dir_all(self.root.join(kind.dir())).await?;
        }
        Ok(())
    }

    /// Resolve a stored relative path
    ///
    /// Returns `None` for paths that would escape the upload directory.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        let safe = path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        safe.then(|| self.root.join(path))
    }

    /// Start writing a new PDF, rejecting anything past `limit` bytes
    pub async fn create(
        &self,
        kind: PdfKind,
        original_name: &str,
        limit: usize,
    ) -> Result<PdfWriter, StoreError> {
        fs::create_dir_all(self.root.join(kind.dir())).await?;

        let generated = format!(
            "{}-{}-{}.pdf",
            kind.prefix(),
            file_stem(original_name),
            Uuid::new_v4().simple()
        );
        let relative_path = format!("{}/{}", kind.dir(), generated);
        let absolute_path = self.root.join(&relative_path);
        let file = File::create(&absolute_path).await?;

        Ok(PdfWriter {
            file: Some(file),
            relative_path,
            absolute_path,
            file_name: display_name(original_name),
            written: 0,
            limit,
            finished: false,
        })
    }

    /// Open a stored PDF for reading
    ///
    /// Returns `Ok(None)` when the file is not on disk.
    pub async fn open(&self, relative: &str) -> std::io::Result<Option<(File, u64)>> {
        let Some(path) = self.resolve(relative) else {
            tracing::warn!("Refusing to open stored path outside upload dir: {}", relative);
            return Ok(None);
        };
        match File::open(&path).await {
            Ok(file) => {
                let len = file.metadata().await?.len();
                Ok(Some((file, len)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Remove a stored PDF
    ///
    /// Failures are logged and never returned: the database row is the
    /// source of truth and a stray file only wastes space.
    pub async fn remove(&self, relative: &str) {
        let Some(path) = self.resolve(relative) else {
            tracing::warn!("Refusing to remove stored path outside upload dir: {}", relative);
            return;
        };
        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!("Removed PDF {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("PDF already missing: {}", path.display());
            }
            Err(e) => tracing::warn!("Failed to remove PDF {}: {}", path.display(), e),
        }
    }

    /// Remove several stored PDFs, skipping empty entries
    pub async fn remove_all<I, S>(&self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            self.remove(path.as_ref()).await;
        }
    }
}

/// Streaming writer for one PDF
#[derive(Debug)]
pub struct PdfWriter {
    file: Option<File>,
    relative_path: String,
    absolute_path: PathBuf,
    file_name: String,
    written: u64,
    limit: usize,
    finished: bool,
}

impl PdfWriter {
    /// Append a chunk, failing once the running size passes the limit
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StoreError> {
        let next = self.written + chunk.len() as u64;
        if next > self.limit as u64 {
            return Err(StoreError::TooLarge { limit: self.limit });
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(chunk).await?;
        }
        self.written = next;
        Ok(())
    }

    /// Flush and close the file
    pub async fn finish(mut self) -> Result<StoredPdf, StoreError> {
        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush().await {
                self.discard().await;
                return Err(e.into());
            }
        }
        self.finished = true;
        Ok(StoredPdf {
            relative_path: self.relative_path.clone(),
            absolute_path: self.absolute_path.clone(),
            file_name: self.file_name.clone(),
            size: self.written,
        })
    }

    /// Delete the partial file
    pub async fn abort(mut self) {
        self.discard().await;
    }

    async fn discard(&mut self) {
        self.file.take();
        self.finished = true;
        if let Err(e) = fs::remove_file(&self.absolute_path).await {
            tracing::warn!(
                "Failed to remove partial upload {}: {}",
                self.absolute_path.display(),
                e
            );
        }
    }
}

impl Drop for PdfWriter {
    fn drop(&mut self) {
        if !self.finished {
            self.file.take();
            if let Err(e) = std::fs::remove_file(&self.absolute_path) {
                tracing::warn!(
                    "Failed to remove abandoned upload {}: {}",
                    self.absolute_path.display(),
                    e
                );
            }
        }
    }
}

/// Filesystem-safe stem derived from the uploaded name
fn file_stem(original_name: &str) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(50)
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Original name safe to echo in a `Content-Disposition` header
pub fn display_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.trim().is_empty() {
        "document.pdf".to_string()
    } else {
        cleaned
    }
}
