use async_trait::async_trait;
use sqlx::Postgres;
use std::sync::Arc;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Resource;
use crate::database::store::Store;

/// Postgres-backed [`Store`] for any [`Resource`].
///
/// Every call checks a connection out through the manager, so the pool is
/// created by whichever request reaches the database first.
pub struct Repository<T> {
    manager: Arc<DatabaseManager>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Resource> Repository<T> {
    pub fn new(manager: Arc<DatabaseManager>) -> Self {
        Self {
            manager,
            _phantom: std::marker::PhantomData,
        }
    }

    fn select_sql() -> String {
        format!("SELECT * FROM {} ORDER BY id", T::TABLE)
    }

    fn select_by_id_sql() -> String {
        format!("SELECT * FROM {} WHERE id = $1", T::TABLE)
    }

    fn insert_sql() -> String {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|n| format!("${n}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders.join(", ")
        )
    }

    /// Sets every column; the id is the last parameter
    fn update_sql() -> String {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(n, column)| format!("{} = ${}", column, n + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE id = ${}",
            T::TABLE,
            assignments.join(", "),
            T::COLUMNS.len() + 1
        )
    }

    fn delete_sql() -> String {
        format!("DELETE FROM {} WHERE id = $1", T::TABLE)
    }
}

#[async_trait]
impl<T: Resource> Store<T> for Repository<T> {
    async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        let mut conn = self.manager.acquire().await?;
        let sql = Self::select_sql();
        let rows = sqlx::query_as::<Postgres, T>(&sql).fetch_all(&mut *conn).await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> Result<Vec<T>, DatabaseError> {
        let mut conn = self.manager.acquire().await?;
        let sql = Self::select_by_id_sql();
        let rows = sqlx::query_as::<Postgres, T>(&sql)
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, fields: &T::Fields) -> Result<(), DatabaseError> {
        let mut conn = self.manager.acquire().await?;
        let sql = Self::insert_sql();
        let mut query = sqlx::query(&sql);
        for value in T::values(fields) {
            query = query.bind(value);
        }
        query.execute(&mut *conn).await?;
        Ok(())
    }

    async fn update(&self, id: i32, fields: &T::Fields) -> Result<u64, DatabaseError> {
        let mut conn = self.manager.acquire().await?;
        let sql = Self::update_sql();
        let mut query = sqlx::query(&sql);
        for value in T::values(fields) {
            query = query.bind(value);
        }
        let result = query.bind(id).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<u64, DatabaseError> {
        let mut conn = self.manager.acquire().await?;
        let sql = Self::delete_sql();
        let result = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }
}
