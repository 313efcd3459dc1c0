//! Backend bridge: the worker thread that owns the tokio runtime and the gateway.

pub mod commands;
pub mod runtime;
