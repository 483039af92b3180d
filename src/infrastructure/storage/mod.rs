use std::sync::Arc;

use actix_web::web::Bytes;
use async_trait::async_trait;

use crate::{entities::upload::UploadedFile, errors::StorageError};

pub mod local;

pub use local::LocalDiskStorage;

/// Key-addressed blob store for uploaded images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Persists `file` under `directory` and returns its generated relative path.
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    async fn read(&self, path: &str) -> Result<Bytes, StorageError>;
}

#[async_trait]
impl<T> ImageStorage for Arc<T>
where
    T: ImageStorage + ?Sized,
{
    async fn put(&self, directory: &str, file: &UploadedFile) -> Result<String, StorageError> {
        (**self).put(directory, file).await
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        (**self).exists(path).await
    }

    async fn read(&self, path: &str) -> Result<Bytes, StorageError> {
        (**self).read(path).await
    }
}
