pub mod error_code;

pub use error_code::{ERROR_CODES, ErrorCode, ErrorType, lookup_error_code};
