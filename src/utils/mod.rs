//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Error types and result types
//! - Document name sanitization
//! - Token logs

pub mod error;
pub mod naming;
pub mod report;

// Re-export commonly used items
pub use error::{ConversionError, ConversionOutput, ConversionResult, ConversionWarning};
pub use naming::{sanitize_name, NameRegistry};
pub use report::{TokenLog, TokenRecord};
