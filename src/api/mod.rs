pub mod extract;
pub mod response;

pub use extract::{JsonBody, RecordId};
pub use response::{ApiResponse, ApiResult, Message};
