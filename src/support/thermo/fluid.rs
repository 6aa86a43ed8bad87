//! Canonical fluid identifiers.
//!
//! A fluid type names a substance; each property model decides how that name
//! is interpreted (for example, [`Water`] supplies constant parameters to the
//! [`Incompressible`](crate::support::thermo::model::Incompressible) model).

mod water;

pub use water::Water;
