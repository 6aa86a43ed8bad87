//! Heating-only operating point, solved by matching condenser duty.
//!
//! The heating set's curves are expressed in evaporator terms, so the
//! condenser duty for a given part-load ratio is only known after the full
//! energy balance. Bisection on the part-load ratio finds the point whose
//! condenser duty meets the target.

mod problem;

use twine_solvers::equation::bisection;
use uom::{
    ConstZero,
    si::{
        f64::{MassRate, Power, TemperatureInterval, ThermodynamicTemperature},
        power::watt,
    },
};

use crate::support::units::TemperatureDifference;

use super::super::{
    config::{FlowMode, UnitPerformanceRecord},
    curves::PerformanceCurves,
    error::SimulateError,
    state::SideState,
    tolerances::PlantTolerances,
};
use super::{
    Stream,
    performance::{OperatingPoint, available_capacity, curve_condenser_temperature},
};

use problem::{CondenserDutyProblem, HeatingOnlyModel};

/// Inputs to a heating-only solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatingConditions {
    /// Source-loop stream feeding the evaporator.
    pub evaporator: Stream,
    /// Hot-water stream.
    pub condenser: Stream,
    /// Residual heating load still to be met.
    pub load: Power,
    /// Minimum temperature of the source outlet node, if any.
    pub node_minimum: Option<ThermodynamicTemperature>,
    pub flow_mode: FlowMode,
}

/// Result of a heating-only solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatingSolution {
    pub point: OperatingPoint,
    /// Capacity curve output, when it came out negative and was clamped.
    pub negative_capacity_ratio: Option<f64>,
}

/// Solves a unit's heating-only operating point against a residual load.
///
/// The hot water may be heated no further than the heating set's reference
/// leaving temperature. The target duty follows the cooling rules with
/// roles swapped: residual load floored at the minimum stable load, capped by
/// full-load condenser duty and by what the hot-water flow can absorb, and
/// never above the residual.
///
/// # Errors
///
/// Returns [`SimulateError::Bisection`] or [`SimulateError::MaxIters`] if the
/// duty match fails.
pub fn solve_heating_only(
    record: &UnitPerformanceRecord,
    conditions: &HeatingConditions,
    curves: &impl PerformanceCurves,
    tolerances: &PlantTolerances,
) -> Result<HeatingSolution, SimulateError> {
    let evap = conditions.evaporator;
    let cond = conditions.condenser;
    let set = &record.heating;

    let condenser_temperature =
        curve_condenser_temperature(set.condenser_basis, cond.temperature, set.condenser_leaving);
    let capacity = available_capacity(
        curves,
        set,
        set.evaporator_leaving,
        condenser_temperature,
    );
    let negative_capacity_ratio = (capacity.raw_ratio < 0.0).then_some(capacity.raw_ratio);

    let idle = HeatingSolution {
        point: OperatingPoint::idle(evap.temperature, cond.temperature),
        negative_capacity_ratio,
    };
    let lift = set.condenser_leaving.minus(cond.temperature);
    if evap.mass_flow <= tolerances.mass_flow
        || cond.mass_flow <= tolerances.mass_flow
        || lift <= TemperatureInterval::ZERO
        || capacity.available <= Power::ZERO
    {
        return Ok(idle);
    }

    let model = HeatingOnlyModel {
        record,
        set,
        evaporator: evap,
        condenser_inlet: cond.temperature,
        node_minimum: conditions.node_minimum,
        capacity,
        condenser_temperature,
        curves,
        tolerances,
    };

    let full_ratio = (set.capacity / capacity.available)
        .value
        .clamp(0.0, set.max_plr);
    let full = model.operating_point(full_ratio);
    let full_duty = full.condenser.duty;

    let to_meet = full_duty.min(conditions.load.max(full_duty * set.min_plr));
    let sized = to_meet.min(cond.mass_flow * cond.cp * lift);
    let target = sized.min(conditions.load);
    if target <= Power::ZERO || full.evaporator.duty <= Power::ZERO {
        return Ok(idle);
    }

    let mut point = if target < full_duty - tolerances.heating_solve.duty_tol {
        match match_duty(&model, target, full_ratio, tolerances)? {
            Some(point) => point,
            None => return Ok(idle),
        }
    } else {
        full
    };
    if point.evaporator.duty <= Power::ZERO {
        return Ok(idle);
    }

    let mass_flow = match conditions.flow_mode {
        FlowMode::Variable => {
            let needed: MassRate = sized / (cond.cp * lift);
            needed.min(cond.mass_flow)
        }
        FlowMode::Constant => cond.mass_flow,
    };
    let rise: TemperatureInterval = point.condenser.duty / (mass_flow * cond.cp);
    point.condenser = SideState {
        inlet_temperature: cond.temperature,
        outlet_temperature: cond.temperature + rise,
        mass_flow,
        ..point.condenser
    };

    Ok(HeatingSolution {
        point,
        negative_capacity_ratio,
    })
}

/// Bisects the part-load ratio on `[0, upper]` for a condenser duty of `target`.
///
/// Returns `None` when even a stopped compressor overshoots the target.
fn match_duty<C: PerformanceCurves>(
    model: &HeatingOnlyModel<'_, C>,
    target: Power,
    upper: f64,
    tolerances: &PlantTolerances,
) -> Result<Option<OperatingPoint>, SimulateError> {
    if model.operating_point(0.0).condenser.duty >= target {
        return Ok(None);
    }

    let problem = CondenserDutyProblem { target };
    let solution = bisection::solve(
        model,
        &problem,
        [0.0, upper],
        &tolerances.heating_solve.bisection(),
        |_event: &bisection::Event<'_, _, _>| -> Option<bisection::Action> { None },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(SimulateError::MaxIters {
            residual: Power::new::<watt>(solution.residual),
            iters: solution.iters,
        });
    }

    Ok(Some(solution.snapshot.output))
}
