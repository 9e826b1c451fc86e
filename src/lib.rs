//! Blockfall (workspace facade crate).
//!
//! Re-exports the simulation core and the shared data types under one name so
//! drivers and tests can depend on a single package while the implementation
//! lives in dedicated crates under `crates/`.

pub use blockfall_core as core;
pub use blockfall_types as types;
