//! Initialization logic for logging that is shared between binaries and
//! tests.
pub mod panic_hook;
pub mod tracing;
