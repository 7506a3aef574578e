//! `Amp` Common Library
//!
//! Shared identity types used by both server and client.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
