//! Tetrion (workspace facade crate).
//!
//! This package keeps a single `tetrion::{types,core,input,engine}` public
//! API while the implementation lives in dedicated crates under `crates/`.

pub use tetrion_core as core;
pub use tetrion_engine as engine;
pub use tetrion_input as input;
pub use tetrion_types as types;
