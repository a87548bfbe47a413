use std::error::Error;

/// The generic error type used by helper code throughout the symfst crates.
///
/// Library operations with well-defined failure modes use their own `thiserror`
/// enums; those convert into this type through `?`.
pub type SymfstError = Box<dyn Error>;
