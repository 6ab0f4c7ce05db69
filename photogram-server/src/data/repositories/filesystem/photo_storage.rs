use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::data::photo_storage::PhotoStorage;
use crate::domain::error::DomainError;

/// Каталог с фотографиями на локальном диске.
#[derive(Debug, Clone)]
pub(crate) struct FsPhotoStorage {
    root: PathBuf,
}

impl FsPhotoStorage {
    /// `root` должен быть абсолютным: путь фиксируется один раз при старте.
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, file_name: &str) -> Result<PathBuf, DomainError> {
        let candidate = Path::new(file_name);
        let is_plain_name = candidate.file_name().is_some_and(|name| name == candidate.as_os_str());
        if !is_plain_name {
            return Err(DomainError::Validation {
                field: "imageFileName",
                message: "must be a plain file name",
            });
        }
        Ok(self.root.join(candidate))
    }
}

#[async_trait]
impl PhotoStorage for FsPhotoStorage {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self.path_for(file_name)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| DomainError::Unexpected(format!("cannot create photo dir: {err}")))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| DomainError::Unexpected(format!("cannot write photo: {err}")))?;

        debug!(path = %path.display(), size = bytes.len(), "photo saved");
        Ok(())
    }

    async fn load(&self, file_name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.path_for(file_name)?;

        tokio::fs::read(&path).await.map_err(|err| match err.kind() {
            ErrorKind::NotFound => DomainError::NotFound(format!("photo file {file_name} does not exist")),
            _ => DomainError::Unexpected(format!("cannot read photo: {err}")),
        })
    }
}
