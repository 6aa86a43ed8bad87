//! # Twine Central Plant
//!
//! Central heat-pump plant models for
//! [Twine](https://github.com/isentropic-dev/twine): a wrapper that dispatches
//! a bank of reversible chiller-heater units across a chilled-water loop, a
//! hot-water loop and a shared source (ground) loop.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific models, including
//!   [`central_heat_pump`](models::thermal::central_heat_pump).
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Utility code lifecycle
//!
//! Utility code starts in a model's internal `core` module and only moves to
//! [`support`] once it is useful across models. Only utilities in
//! [`support`] are part of the public API; model-specific helpers stay private.

pub mod models;
pub mod support;
