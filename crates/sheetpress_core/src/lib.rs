pub mod config;
pub mod error;
pub mod logging;

pub use config::SheetpressConfig;
pub use error::{ConvertError, ErrorCategory, classify_error};
