//! File storage for uploaded photos and DNI images. The survey engine only
//! ever sees the stored reference, never the payload.

use base64::{prelude::BASE64_STANDARD, Engine};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("invalid image payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

pub trait ImageStore: Send + Sync {
    /// Store a base64-encoded payload and return its reference.
    fn store(&self, prefix: &str, payload: &str) -> Result<String, UploadError>;
}

pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl ImageStore for FsImageStore {
    fn store(&self, prefix: &str, payload: &str) -> Result<String, UploadError> {
        let bytes = BASE64_STANDARD.decode(payload.trim().as_bytes())?;
        let name = format!("{}-{}.jpg", prefix, uuid::Uuid::new_v4());
        std::fs::write(self.dir.join(&name), bytes)?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_decoded_payload() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(dir.path().to_path_buf()).unwrap();

        let name = store.store("dni", "aG9sYQ==").unwrap();
        assert!(name.starts_with("dni-"));

        let stored = std::fs::read(dir.path().join(&name)).unwrap();
        assert_eq!(stored, b"hola");
    }

    #[test]
    fn rejects_bad_base64() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsImageStore::new(dir.path().to_path_buf()).unwrap();

        let err = store.store("answer", "no es base64!!").unwrap_err();
        assert!(matches!(err, UploadError::InvalidPayload(_)));
    }
}
