//! Shared foundational types used across the Strata floorplanning workspace.
//!
//! This crate provides interned identifiers for module and pin names and the
//! common internal-error result type.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{InternalError, StrataResult};
