//! Request extractors that reject with [`crate::error::ApiError`] bodies.

mod json;
mod path_id;

pub use json::{ApiJson, ApiQuery};
pub use path_id::PathId;
