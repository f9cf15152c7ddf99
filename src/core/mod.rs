//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod pairs;
pub mod storage;

// Re-export main types for cleaner imports
pub use currency::{ConversionResult, Pair, RateSource};
pub use error::ConversionError;
pub use storage::Storage;
