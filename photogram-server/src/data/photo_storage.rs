use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait PhotoStorage: Send + Sync {
    /// Создаёт каталог при необходимости и записывает файл целиком.
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), DomainError>;
    async fn load(&self, file_name: &str) -> Result<Vec<u8>, DomainError>;
}

#[async_trait]
impl<T: PhotoStorage + ?Sized> PhotoStorage for Arc<T> {
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        (**self).save(file_name, bytes).await
    }

    async fn load(&self, file_name: &str) -> Result<Vec<u8>, DomainError> {
        (**self).load(file_name).await
    }
}
