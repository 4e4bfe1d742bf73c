//! Blob store contract for recipe photos.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::Result;

/// Stores uploaded photos and publishes them under a public URL.
#[async_trait]
pub trait BlobStoreTrait: Send + Sync {
    /// Stores `bytes` under a fresh random name and returns its public URL.
    ///
    /// Fails with `Error::BlobStorage` if nothing could be stored; no URL is
    /// produced in that case.
    async fn upload(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String>;
}

/// Random object name keeping the extension of the uploaded file, e.g. `3f2c...e1.jpg`.
pub fn object_name(suggested_name: &str) -> String {
    let id = Uuid::new_v4();
    match extension(suggested_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_keeps_extension() {
        let name = object_name("Grandma's Pie.JPG");
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), 36 + 4);
    }

    #[test]
    fn test_object_name_without_usable_extension() {
        assert_eq!(object_name("photo").len(), 36);
        assert_eq!(object_name(".hidden").len(), 36);
        assert_eq!(object_name("a.b/../x").len(), 36);
    }

    #[test]
    fn test_object_names_are_unique() {
        assert_ne!(object_name("a.png"), object_name("a.png"));
    }
}
