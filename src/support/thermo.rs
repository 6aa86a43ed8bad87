//! Loop-fluid property modeling.
//!
//! Plant loops carry liquids whose density and specific heat are needed as
//! functions of temperature only. Capabilities are expressed as small traits
//! in [`capability`], implemented by the property models in [`model`] for the
//! substances named in [`fluid`].

mod error;

pub mod capability;
pub mod fluid;
pub mod model;

pub use error::PropertyError;
