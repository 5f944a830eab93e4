//! Infrastructure layer module
//!
//! This module contains the adapters around the configuration store:
//! - Layered file and environment loading
//! - Hot-reload handle
//! - Logging infrastructure

pub mod config;
pub mod logging;
