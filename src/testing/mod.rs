//! In-memory stand-ins for the Postgres store, used by the test suites to drive
//! the real router without a database.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::app::AppState;
use crate::config::ApiConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::{Question, Resource, User};
use crate::database::store::{HealthCheck, Store};

/// Rows kept in a `Vec`, ids assigned from 1 like a `SERIAL` column.
///
/// `set_failing(true)` makes every call return a query error, which is how the
/// tests exercise the 500 paths.
pub struct MemoryStore<R> {
    rows: Mutex<Vec<R>>,
    next_id: Mutex<i32>,
    failing: AtomicBool,
}

impl<R: Resource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            failing: AtomicBool::new(false),
        }
    }
}

impl<R: Resource> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the stored rows
    pub fn rows(&self) -> Vec<R> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError(format!(
                "relation \"{}\" is unavailable",
                R::TABLE
            )));
        }
        Ok(())
    }

    fn lock_rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<R>>, DatabaseError> {
        self.rows
            .lock()
            .map_err(|_| DatabaseError::QueryError("store lock poisoned".into()))
    }
}

#[async_trait]
impl<R: Resource> Store<R> for MemoryStore<R> {
    async fn list(&self) -> Result<Vec<R>, DatabaseError> {
        self.check()?;
        Ok(self.lock_rows()?.clone())
    }

    async fn find(&self, id: i32) -> Result<Vec<R>, DatabaseError> {
        self.check()?;
        Ok(self
            .lock_rows()?
            .iter()
            .filter(|row| row.id() == id)
            .cloned()
            .collect())
    }

    async fn insert(&self, fields: &R::Fields) -> Result<(), DatabaseError> {
        self.check()?;
        let id = {
            let mut next = self
                .next_id
                .lock()
                .map_err(|_| DatabaseError::QueryError("id sequence poisoned".into()))?;
            let id = *next;
            *next += 1;
            id
        };
        self.lock_rows()?.push(R::from_fields(id, fields.clone()));
        Ok(())
    }

    async fn update(&self, id: i32, fields: &R::Fields) -> Result<u64, DatabaseError> {
        self.check()?;
        let mut affected = 0;
        for row in self.lock_rows()?.iter_mut().filter(|row| row.id() == id) {
            *row = R::from_fields(id, fields.clone());
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, id: i32) -> Result<u64, DatabaseError> {
        self.check()?;
        let mut rows = self.lock_rows()?;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok((before - rows.len()) as u64)
    }
}

/// Health check with a switchable failure message
#[derive(Default)]
pub struct MemoryHealth {
    error: Mutex<Option<String>>,
}

impl MemoryHealth {
    pub fn set_error(&self, error: Option<&str>) {
        if let Ok(mut slot) = self.error.lock() {
            *slot = error.map(str::to_string);
        }
    }
}

#[async_trait]
impl HealthCheck for MemoryHealth {
    async fn ping(&self) -> Result<(), DatabaseError> {
        match self.error.lock().ok().and_then(|e| e.clone()) {
            Some(message) => Err(DatabaseError::QueryError(message)),
            None => Ok(()),
        }
    }
}

/// Router state over in-memory stores, with handles kept for assertions
pub struct MemoryBackend {
    pub questions: Arc<MemoryStore<Question>>,
    pub users: Arc<MemoryStore<User>>,
    pub health: Arc<MemoryHealth>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            questions: Arc::new(MemoryStore::new()),
            users: Arc::new(MemoryStore::new()),
            health: Arc::new(MemoryHealth::default()),
        }
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            self.questions.clone(),
            self.users.clone(),
            self.health.clone(),
            "Test Author",
        )
    }

    pub fn router(&self) -> axum::Router {
        crate::app::app(self.state(), &test_api_config())
    }
}

pub fn test_api_config() -> ApiConfig {
    ApiConfig {
        author: "Test Author".to_string(),
        enable_cors: false,
        max_request_size_bytes: 64 * 1024,
    }
}
