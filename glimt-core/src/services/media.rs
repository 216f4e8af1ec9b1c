//! Media service - image storage on the local file system
//!
//! The file system is an external collaborator: this service only writes the
//! bytes under the uploads directory and hands back the public route.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::result::Result;

/// Media service for stored uploads
pub struct MediaService {
    uploads_dir: PathBuf,
}

impl MediaService {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    /// Store image bytes under a generated unique filename.
    ///
    /// Returns the public route to the file, e.g. "/uploads/{uuid}_{name}".
    pub fn store_image(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        std::fs::create_dir_all(&self.uploads_dir)?;

        let file_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(original_name));
        std::fs::write(self.uploads_dir.join(&file_name), bytes)?;

        Ok(format!("/uploads/{}", file_name))
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }
}

/// Strip any path components from an uploaded file name
fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    base.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_image_returns_public_route() {
        let dir = TempDir::new().unwrap();
        let service = MediaService::new(dir.path().join("uploads"));

        let route = service.store_image("photo.jpg", b"fake-bytes").unwrap();
        assert!(route.starts_with("/uploads/"));
        assert!(route.ends_with("_photo.jpg"));

        // The stored file exists and carries the bytes
        let stored = dir
            .path()
            .join("uploads")
            .join(route.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(stored).unwrap(), b"fake-bytes");
    }

    #[test]
    fn test_unique_filenames_for_same_source() {
        let dir = TempDir::new().unwrap();
        let service = MediaService::new(dir.path().join("uploads"));

        let a = service.store_image("photo.jpg", b"a").unwrap();
        let b = service.store_image("photo.jpg", b"b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\pics\\cat.png"), "cat.png");
        assert_eq!(sanitize_file_name("plain.jpg"), "plain.jpg");
    }
}
