//! Utility types and functions for the symfst crates.
//!
//! Forbid unsafe code in this crate.
#![forbid(unsafe_code)]

mod error;
mod macros;
mod test_logger;
mod unique_name;
mod vecset;

pub use error::*;
pub use random_test::*;
pub use test_logger::*;
pub use unique_name::*;
pub use vecset::*;
