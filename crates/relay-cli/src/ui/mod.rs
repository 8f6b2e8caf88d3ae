//! # CLI UI Module
//!
//! Styling for the few lines relay prints itself. Everything else on the
//! terminal belongs to the dispatched program.
//!
//! - `color`: Color mode detection and terminal capability checks
//! - `style`: Message types, prefixes, and styling functions

pub mod color;
pub mod style;

pub use style::Style;
