//! Core types for Caspian.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod kind;

pub use id::*;
pub use kind::ProductKind;
