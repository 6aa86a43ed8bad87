//! Unit and wrapper configuration.
//!
//! Each entity comes in two layers: a raw `*Spec` record as it would arrive
//! from an input file, and a validated record holding resolved curve handles
//! and derived values.

mod error;
mod unit;
mod wrapper;

pub use error::ConfigError;
pub use unit::{
    Autosizable, CondenserBasis, CurveSet, FlowMode, ReferenceSet, ReferenceSpec,
    UnitPerformanceRecord, UnitSpec,
};
pub use wrapper::{ComponentSlot, UnitInstance, WrapperConfig, WrapperSpec};
