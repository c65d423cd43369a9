//! Anvil: a Rust data layer with pluggable SQL dialects.
//!
//! This crate re-exports [`anvil_core`]. Database specific dialects, like the
//! DM8 one in `anvil-dm8`, implement its [`Dialect`], [`Migrator`] and
//! [`Driver`] traits.

pub use anvil_core::*;
