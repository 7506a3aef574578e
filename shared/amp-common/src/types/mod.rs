//! Shared Types

mod identity;

pub use identity::*;
