//! This crate contains the logging setup shared by the binaries of this
//! workspace: the subscriber initialization and a panic hook that reports
//! through `tracing`.
pub mod tracing;
