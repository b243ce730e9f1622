//! Common utilities and types shared across mvctl

pub mod config;
pub mod error;
pub mod utils;

pub use config::{ClientConfig, Credentials};
pub use error::{Error, Result};
pub use utils::{encode_query_value, parse_duration};
