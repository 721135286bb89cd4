//! Storage Error Types

use sg_types::CategoryId;

use crate::access::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Category {category_id} still has {services} service(s); reassign them first")]
    CategoryInUse {
        category_id: CategoryId,
        services: i64,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Inconsistent catalog data: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
