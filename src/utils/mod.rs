pub mod errors;

pub use errors::{truncate_body, AppError};
