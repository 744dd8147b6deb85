use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::Resource;

/// Persistence for one resource table.
///
/// Every method issues exactly one statement. Lookups return a `Vec` because the
/// HTTP contract answers `GET /:id` with the array of matching rows.
#[async_trait]
pub trait Store<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, DatabaseError>;

    async fn find(&self, id: i32) -> Result<Vec<R>, DatabaseError>;

    async fn insert(&self, fields: &R::Fields) -> Result<(), DatabaseError>;

    /// Overwrites every column of row `id`. Returns the affected row count.
    async fn update(&self, id: i32, fields: &R::Fields) -> Result<u64, DatabaseError>;

    /// Returns the affected row count.
    async fn delete(&self, id: i32) -> Result<u64, DatabaseError>;
}

/// Connectivity check backing `/` and `/health`
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}
