//! Public Twine models.
//!
//! # Model structure
//!
//! Each model lives in its own module and keeps its computation in an internal
//! `core` submodule. The public surface of a model is whatever its module
//! re-exports from that core, plus thin [`twine_core::Model`] adapters that
//! delegate to it.

pub mod thermal;
