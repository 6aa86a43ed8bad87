//! Loop-fluid property models.

pub mod incompressible;
pub mod linear_liquid;

pub use incompressible::Incompressible;
pub use linear_liquid::{LinearLiquid, LinearLiquidError};
