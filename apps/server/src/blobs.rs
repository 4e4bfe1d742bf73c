//! Filesystem-backed photo storage served under `/images`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use recipesaver_core::blobs::{object_name, BlobStoreTrait};
use recipesaver_core::constants::IMAGE_BUCKET;
use recipesaver_core::{Error, Result};
use tokio::io::AsyncWriteExt;

pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    /// Creates the upload directory if it does not exist yet.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            Error::BlobStorage(format!(
                "Cannot create upload directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn public_url(&self, object: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, IMAGE_BUCKET, object)
    }
}

#[async_trait]
impl BlobStoreTrait for FsBlobStore {
    async fn upload(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String> {
        if bytes.is_empty() {
            return Err(Error::BlobStorage("Uploaded file is empty".to_string()));
        }
        let object = object_name(suggested_name);
        let path = self.root.join(&object);
        // create_new: a name collision must not overwrite another photo
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| Error::BlobStorage(format!("Cannot create {}: {}", object, e)))?;
        let written = match file.write_all(&bytes).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&path).await;
            return Err(Error::BlobStorage(format!("Cannot write {}: {}", object, e)));
        }
        tracing::info!("Stored photo {} ({} bytes)", object, bytes.len());
        Ok(self.public_url(&object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn stores_file_and_returns_public_url() {
        let tmp = tempdir().unwrap();
        let store = FsBlobStore::new(tmp.path().join("uploads"), "http://localhost:8080/").unwrap();

        let url = store.upload(b"jpeg-bytes".to_vec(), "Cake.JPG").await.unwrap();

        assert!(url.starts_with("http://localhost:8080/images/"));
        assert!(url.ends_with(".jpg"));
        let object = url.rsplit('/').next().unwrap();
        let stored = std::fs::read(store.root().join(object)).unwrap();
        assert_eq!(stored, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn rejects_empty_payload() {
        let tmp = tempdir().unwrap();
        let store = FsBlobStore::new(tmp.path(), "http://localhost:8080").unwrap();

        let result = store.upload(Vec::new(), "empty.png").await;

        assert!(matches!(result, Err(Error::BlobStorage(_))));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn each_upload_gets_a_fresh_name() {
        let tmp = tempdir().unwrap();
        let store = FsBlobStore::new(tmp.path(), "http://x").unwrap();

        let first = store.upload(vec![1], "a.png").await.unwrap();
        let second = store.upload(vec![2], "a.png").await.unwrap();

        assert_ne!(first, second);
    }
}
