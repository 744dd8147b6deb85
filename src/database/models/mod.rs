pub mod question;
pub mod user;

pub use question::{Question, QuestionDraft, QuestionFields};
pub use user::{User, UserDraft, UserFields};

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow};

/// User-facing (Portuguese) wording for one resource
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    /// Definite singular, e.g. "a questão"
    pub singular: &'static str,
    /// Definite plural, e.g. "as questões"
    pub plural: &'static str,
    pub not_found: &'static str,
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
}

/// A table exposed through the uniform CRUD routes.
///
/// Implementors describe their table and columns once; the repository and the
/// handlers are written against this trait only.
pub trait Resource:
    Serialize + for<'r> FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static
{
    /// Every writable column, all present
    type Fields: Clone + Send + Sync + 'static;
    /// Request body shape: every column optional
    type Draft: Draft<Fields = Self::Fields> + DeserializeOwned + Default + Send + 'static;

    const TABLE: &'static str;
    /// Route prefix, e.g. "/questoes"
    const PATH: &'static str;
    /// Writable columns, in the order `values` yields them
    const COLUMNS: &'static [&'static str];
    const LABELS: Labels;

    fn id(&self) -> i32;
    fn fields(&self) -> Self::Fields;
    fn from_fields(id: i32, fields: Self::Fields) -> Self;
    fn values(fields: &Self::Fields) -> Vec<&str>;
}

/// Decoded request body awaiting validation (create) or merge (update)
pub trait Draft {
    type Fields;

    /// Complete field set, or the names of every missing/empty required field
    fn into_fields(self) -> Result<Self::Fields, Vec<&'static str>>;

    /// Supplied values win; absent or empty ones keep `current`
    fn merge(self, current: Self::Fields) -> Self::Fields;
}

/// Presence check shared by the drafts: absent and empty strings both count as missing
pub(crate) fn required(
    name: &'static str,
    value: Option<String>,
    missing: &mut Vec<&'static str>,
) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

/// Update counterpart of [`required`]: an absent or empty value keeps `current`
pub(crate) fn supplied(value: Option<String>, current: String) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(current)
}
