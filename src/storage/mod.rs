//! Blob storage for uploaded album covers.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

pub trait StorageService: Send + Sync {
    /// Persists `data` and returns the public URL it can be fetched from.
    fn write_file(&self, file_name: &str, data: &[u8]) -> Result<String, StorageError>;
}

/// Directory served under `/upload` that holds uploaded images in `images/`.
pub struct LocalStorage {
    root_dir: PathBuf,
    public_base_url: String,
}

pub const IMAGES_SUBDIR: &str = "images";

impl LocalStorage {
    pub fn new(root_dir: impl Into<PathBuf>, public_base_url: &str) -> Result<Self, StorageError> {
        let root_dir = root_dir.into();
        fs::create_dir_all(root_dir.join(IMAGES_SUBDIR))?;
        Ok(Self {
            root_dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}

impl StorageService for LocalStorage {
    fn write_file(&self, file_name: &str, data: &[u8]) -> Result<String, StorageError> {
        let stored_name = format!("{}-{}", Uuid::new_v4().simple(), sanitize_filename(file_name)?);
        let file_path = self.root_dir.join(IMAGES_SUBDIR).join(&stored_name);

        let mut file = fs::File::create(&file_path)?;
        file.write_all(data)?;
        file.flush()?;

        Ok(format!(
            "{}/upload/{}/{}",
            self.public_base_url, IMAGES_SUBDIR, stored_name
        ))
    }
}

fn sanitize_filename(filename: &str) -> Result<String, StorageError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StorageError::InvalidFilename(filename.to_string()))?;

    if name.contains('\0') || name.starts_with('.') {
        return Err(StorageError::InvalidFilename(filename.to_string()));
    }

    Ok(name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%' | '#' | ' ' => '_',
            _ => c,
        })
        .collect())
}
