use crate::traits::{Stager, StagingError, StagingResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "upload-";
const FILE_SUFFIX: &str = ".png";

/// Stages payloads as `upload-<random>.png` files in a local directory.
#[derive(Clone, Debug)]
pub struct LocalStager {
    dir: PathBuf,
}

impl LocalStager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn write_unique(dir: &Path, data: &[u8]) -> StagingResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        StagingError::DirectoryUnavailable(format!("{}: {}", dir.display(), e))
    })?;

    // tempfile opens with O_EXCL, so an existing name is never reused.
    let mut file = tempfile::Builder::new()
        .prefix(FILE_PREFIX)
        .suffix(FILE_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| StagingError::CreateFailed(e.to_string()))?;

    file.write_all(data)
        .and_then(|_| file.flush())
        .map_err(|e| StagingError::WriteFailed(e.to_string()))?;

    let (_, path) = file
        .keep()
        .map_err(|e| StagingError::WriteFailed(e.to_string()))?;
    Ok(path)
}

#[async_trait]
impl Stager for LocalStager {
    async fn stage(&self, data: Bytes) -> StagingResult<PathBuf> {
        let dir = self.dir.clone();
        let path = tokio::task::spawn_blocking(move || write_unique(&dir, &data))
            .await
            .map_err(|e| StagingError::WriteFailed(format!("staging task failed: {}", e)))??;

        tracing::debug!(path = %path.display(), "Upload staged");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stage_writes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let stager = LocalStager::new(dir.path());

        let path = stager.stage(Bytes::from_static(b"\x89PNG\r\n\x1a\nab")).await.unwrap();

        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("upload-"));
        assert!(name.ends_with(".png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG\r\n\x1a\nab");
    }

    #[tokio::test]
    async fn test_stage_never_reuses_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let stager = LocalStager::new(dir.path());

        let first = stager.stage(Bytes::from_static(b"one")).await.unwrap();
        let second = stager.stage(Bytes::from_static(b"two")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read(&first).unwrap(), b"one");
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_stage_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("tmp").join("uploads");
        let stager = LocalStager::new(&nested);

        let path = stager.stage(Bytes::from_static(b"x")).await.unwrap();
        assert!(path.starts_with(&nested));
    }

    #[tokio::test]
    async fn test_stage_fails_when_directory_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = LocalStager::new(&blocker)
            .stage(Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StagingError::DirectoryUnavailable(_)));
    }
}
