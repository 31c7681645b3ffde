//! Core abstractions for model processing
//!
//! This module defines the traits every pipeline stage implements, together
//! with the shared error type, logging setup and transform configuration.

mod config;
mod database;
mod error;
pub mod logging;
mod stage;

pub use config::*;
pub use database::*;
pub use error::*;
pub use logging::*;
pub use stage::*;
