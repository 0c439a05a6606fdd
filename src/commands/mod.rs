//! Backend commands
//!
//! Framework-agnostic operations the HTTP routes call into.

pub mod push;
