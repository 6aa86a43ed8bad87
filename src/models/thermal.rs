//! Thermal systems models.
//!
//! This module contains plant-level models for heating and cooling
//! equipment.

pub mod central_heat_pump;
