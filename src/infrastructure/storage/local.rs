use std::{
    io,
    path::{Component, Path, PathBuf},
};

use actix_web::web::Bytes;
use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use tokio::fs;

use crate::{entities::upload::UploadedFile, errors::StorageError, storage::ImageStorage};

const HASH_NAME_LENGTH: usize = 40;

/// Stores files below a root directory on the local disk.
#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    root: PathBuf,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalDiskStorage { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative storage path, refusing anything that escapes the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path.trim_start_matches('/'));

        let is_safe = relative.components().all(|c| matches!(c, Component::Normal(_)));
        if !is_safe || relative.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath(path.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

/// Random 40 character name; the extension comes from the file's magic bytes,
/// falling back to the client file name.
pub fn hash_name(file: &UploadedFile) -> String {
    let stem: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(HASH_NAME_LENGTH)
        .map(char::from)
        .collect();

    let extension = infer::get(&file.bytes)
        .map(|kind| kind.extension().to_string())
        .or_else(|| file.client_extension());

    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

#[async_trait]
impl ImageStorage for LocalDiskStorage {
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError> {
        let directory = directory.trim_matches('/');
        let relative = if directory.is_empty() {
            hash_name(file)
        } else {
            format!("{}/{}", directory, hash_name(file))
        };

        let target = self.resolve(&relative)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &file.bytes).await?;

        tracing::info!(path = %relative, bytes = file.bytes.len(), "Stored uploaded file");
        Ok(relative)
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let target = self.resolve(path)?;
        Ok(fs::try_exists(target).await?)
    }

    async fn read(&self, path: &str) -> Result<Bytes, StorageError> {
        let target = self.resolve(path)?;
        match fs::read(&target).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    fn temp_storage() -> LocalDiskStorage {
        LocalDiskStorage::new(std::env::temp_dir().join(format!("posts-storage-{}", Uuid::new_v4())))
    }

    #[test]
    fn hash_name_prefers_detected_extension() {
        let file = UploadedFile::new("picture.txt", None, JPEG_HEADER.to_vec());
        let name = hash_name(&file);

        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(stem.len(), HASH_NAME_LENGTH);
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(ext, "jpg");
    }

    #[test]
    fn hash_name_falls_back_to_client_extension() {
        let file = UploadedFile::new("my_image.jpg", None, Vec::new());
        assert!(hash_name(&file).ends_with(".jpg"));
    }

    #[test]
    fn hash_names_differ_per_upload() {
        let file = UploadedFile::new("my_image.jpg", None, Vec::new());
        assert_ne!(hash_name(&file), hash_name(&file));
    }

    #[actix_rt::test]
    async fn put_writes_file_under_directory() {
        let storage = temp_storage();
        let file = UploadedFile::new("my_image.jpg", Some("image/jpeg"), JPEG_HEADER.to_vec());

        let path = storage.put("/images", &file).await.unwrap();

        assert!(path.starts_with("images/"));
        assert!(storage.exists(&path).await.unwrap());
        assert_eq!(storage.read(&path).await.unwrap().as_ref(), &JPEG_HEADER);
        assert!(storage.root().join(&path).is_file());
    }

    #[actix_rt::test]
    async fn missing_file_reports_not_found() {
        let storage = temp_storage();

        assert!(!storage.exists("images/nothing.jpg").await.unwrap());
        assert!(matches!(
            storage.read("images/nothing.jpg").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[actix_rt::test]
    async fn paths_escaping_root_are_rejected() {
        let storage = temp_storage();

        assert!(matches!(
            storage.read("../etc/passwd").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.exists("images/../../secret").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
