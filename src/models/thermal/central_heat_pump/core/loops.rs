//! Plant-loop node records shared with the host solver.
//!
//! Node state is the wrapper's output channel: the host reads outlet
//! temperatures and flows straight from these records after each call.

use uom::{
    ConstZero,
    si::f64::{MassRate, ThermodynamicTemperature},
};

/// The three loops a wrapper connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// Chilled water, served by the evaporators.
    Chilled,
    /// Hot water, served by the condensers in heating.
    Hot,
    /// Ground or condenser loop taking the balance of energy.
    Source,
}

/// One plant node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopNode {
    pub temperature: ThermodynamicTemperature,
    pub mass_flow: MassRate,
    pub mass_flow_max: MassRate,
    pub mass_flow_max_avail: MassRate,
    pub mass_flow_min_avail: MassRate,
    /// Temperature setpoint, if a setpoint manager placed one here.
    pub setpoint: Option<ThermodynamicTemperature>,
    /// Lowest temperature this node may reach.
    pub temperature_min: Option<ThermodynamicTemperature>,
}

impl LoopNode {
    /// A stagnant node at the given temperature with no flow limits set.
    #[must_use]
    pub fn at(temperature: ThermodynamicTemperature) -> Self {
        Self {
            temperature,
            mass_flow: MassRate::ZERO,
            mass_flow_max: MassRate::ZERO,
            mass_flow_max_avail: MassRate::ZERO,
            mass_flow_min_avail: MassRate::ZERO,
            setpoint: None,
            temperature_min: None,
        }
    }
}

/// The wrapper's connection to one loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSide {
    pub inlet: LoopNode,
    pub outlet: LoopNode,
    /// Setpoint of the loop's controlling node.
    pub loop_setpoint: ThermodynamicTemperature,
    /// Set by the host when the loop flow has been resolved and must not
    /// change for the rest of the iteration.
    pub flow_locked: bool,
}

impl LoopSide {
    /// Setpoint for this side's outlet, falling back to the loop setpoint.
    #[must_use]
    pub fn outlet_setpoint(&self) -> ThermodynamicTemperature {
        self.outlet.setpoint.unwrap_or(self.loop_setpoint)
    }

    /// Flow the wrapper may draw on this loop for the current call.
    ///
    /// A locked loop offers exactly its actual flow.
    #[must_use]
    pub fn available_flow(&self) -> MassRate {
        if self.flow_locked {
            self.inlet.mass_flow
        } else {
            self.inlet.mass_flow_max_avail
        }
    }

    /// Registers the wrapper's design flow as the node's maximum.
    ///
    /// Availability starts at the maximum and the minimum at zero, so the
    /// host can narrow both once the loop is sized.
    pub fn register_design_flow(&mut self, design: MassRate) {
        for node in [&mut self.inlet, &mut self.outlet] {
            node.mass_flow_max = design;
            node.mass_flow_max_avail = design;
            node.mass_flow_min_avail = MassRate::ZERO;
        }
    }

    /// Asks for `request` on this loop.
    ///
    /// An unlocked loop gets the request clamped to the node's availability
    /// and maximum; a locked loop keeps its current flow. The outlet always
    /// mirrors the inlet.
    pub fn request_flow(&mut self, request: MassRate) {
        if !self.flow_locked {
            let upper = if self.inlet.mass_flow_max > MassRate::ZERO {
                self.inlet.mass_flow_max_avail.min(self.inlet.mass_flow_max)
            } else {
                self.inlet.mass_flow_max_avail
            };
            let lower = self.inlet.mass_flow_min_avail.min(upper);
            self.inlet.mass_flow = request.max(lower).min(upper);
        }
        self.outlet.mass_flow = self.inlet.mass_flow;
    }
}

/// Node records for all three loops of a wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantNodes {
    pub chilled: LoopSide,
    pub hot: LoopSide,
    pub source: LoopSide,
}

impl PlantNodes {
    #[must_use]
    pub fn side(&self, kind: LoopKind) -> &LoopSide {
        match kind {
            LoopKind::Chilled => &self.chilled,
            LoopKind::Hot => &self.hot,
            LoopKind::Source => &self.source,
        }
    }

    pub fn side_mut(&mut self, kind: LoopKind) -> &mut LoopSide {
        match kind {
            LoopKind::Chilled => &mut self.chilled,
            LoopKind::Hot => &mut self.hot,
            LoopKind::Source => &mut self.source,
        }
    }
}

/// Working fluid of each loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopFluids<F> {
    pub chilled: F,
    pub hot: F,
    pub source: F,
}

impl<F: Clone> LoopFluids<F> {
    /// The same fluid on all three loops.
    #[must_use]
    pub fn uniform(fluid: F) -> Self {
        Self {
            chilled: fluid.clone(),
            hot: fluid.clone(),
            source: fluid,
        }
    }
}
