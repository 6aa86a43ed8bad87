use uom::si::{f64::Power, power::watt};

use crate::support::constraint::{Constrained, NonNegative};

use super::super::{
    diagnostics::{DiagnosticKind, DiagnosticLog, RuntimeDiagnostic},
    schedule::ScheduleId,
};
use super::{ConfigError, FlowMode, UnitPerformanceRecord};

/// One entry of a wrapper's ordered component list.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSlot {
    /// Name of the unit performance record.
    pub unit: String,
    /// Operating schedule for this slot; `None` is always on.
    pub schedule: Option<ScheduleId>,
    /// Number of identical units this slot stands for.
    pub identical_count: usize,
}

/// Raw wrapper definition.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperSpec {
    pub name: String,
    /// Only `"SmartMixing"` is supported.
    pub control_mode: String,
    pub ancillary_power: Power,
    pub ancillary_schedule: Option<ScheduleId>,
    pub components: Vec<ComponentSlot>,
}

/// A single unit instance after identical-unit expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitInstance {
    /// Index into [`WrapperConfig::slots`].
    pub slot: usize,
    /// Index into [`WrapperConfig::records`].
    pub record: usize,
    pub schedule: Option<ScheduleId>,
    /// `"<unit> #<n>"`, used to key diagnostics.
    pub label: String,
}

/// Validated wrapper definition with a flat list of unit instances.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperConfig {
    pub name: String,
    pub flow_mode: FlowMode,
    pub ancillary_power: Constrained<Power, NonNegative>,
    pub ancillary_schedule: Option<ScheduleId>,
    pub slots: Vec<ComponentSlot>,
    records: Vec<UnitPerformanceRecord>,
    instances: Vec<UnitInstance>,
}

impl WrapperConfig {
    /// Validates a wrapper and expands its slots into unit instances.
    ///
    /// Instances appear in slot order, with each slot's identical units
    /// adjacent. Units that disagree on flow mode are all switched to
    /// constant flow with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unsupported control mode, an empty
    /// component list, an unknown unit name, or a zero identical count.
    pub fn new(
        spec: WrapperSpec,
        units: Vec<UnitPerformanceRecord>,
        log: &mut DiagnosticLog,
    ) -> Result<Self, ConfigError> {
        let WrapperSpec {
            name,
            control_mode,
            ancillary_power,
            ancillary_schedule,
            components,
        } = spec;

        if !control_mode.eq_ignore_ascii_case("SmartMixing") {
            return Err(ConfigError::UnsupportedControlMode {
                wrapper: name,
                mode: control_mode,
            });
        }
        if components.is_empty() {
            return Err(ConfigError::NoUnits { wrapper: name });
        }
        let ancillary_power =
            NonNegative::new(ancillary_power).map_err(|_| ConfigError::AncillaryPower {
                wrapper: name.clone(),
                value: ancillary_power.get::<watt>(),
            })?;

        let mut records: Vec<UnitPerformanceRecord> = Vec::new();
        let mut instances = Vec::new();
        for (slot_index, slot) in components.iter().enumerate() {
            if slot.identical_count == 0 {
                return Err(ConfigError::IdenticalCount {
                    wrapper: name,
                    unit: slot.unit.clone(),
                });
            }

            let record = match records
                .iter()
                .position(|record| record.name.eq_ignore_ascii_case(&slot.unit))
            {
                Some(index) => index,
                None => {
                    let Some(record) = units
                        .iter()
                        .find(|record| record.name.eq_ignore_ascii_case(&slot.unit))
                    else {
                        return Err(ConfigError::UnknownUnit {
                            wrapper: name,
                            unit: slot.unit.clone(),
                        });
                    };
                    records.push(record.clone());
                    records.len() - 1
                }
            };

            for copy in 1..=slot.identical_count {
                instances.push(UnitInstance {
                    slot: slot_index,
                    record,
                    schedule: slot.schedule,
                    label: format!("{} #{copy}", records[record].name),
                });
            }
        }

        let mismatched = records
            .iter()
            .any(|record| record.flow_mode != records[0].flow_mode);
        if mismatched {
            log.record(RuntimeDiagnostic::new(
                DiagnosticKind::FlowModeMismatch,
                &name,
                "units disagree on flow mode, using constant flow for all",
            ));
            for record in &mut records {
                record.flow_mode = FlowMode::Constant;
            }
        }

        let flow_mode = if records
            .iter()
            .all(|record| record.flow_mode == FlowMode::Variable)
        {
            FlowMode::Variable
        } else {
            FlowMode::Constant
        };

        Ok(Self {
            name,
            flow_mode,
            ancillary_power,
            ancillary_schedule,
            slots: components,
            records,
            instances,
        })
    }

    /// Performance records used by this wrapper, one per distinct unit.
    #[must_use]
    pub fn records(&self) -> &[UnitPerformanceRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [UnitPerformanceRecord] {
        &mut self.records
    }

    /// Unit instances in dispatch order.
    #[must_use]
    pub fn instances(&self) -> &[UnitInstance] {
        &self.instances
    }

    /// Performance record behind an instance.
    #[must_use]
    pub fn record(&self, instance: usize) -> &UnitPerformanceRecord {
        &self.records[self.instances[instance].record]
    }

    /// Expanded unit count: the sum of all identical counts.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.instances.len()
    }

    /// Heating-to-cooling capacity ratio of the first instance.
    ///
    /// Simultaneous dominance is judged against this single threshold even
    /// when units differ.
    #[must_use]
    pub fn dominance_threshold(&self) -> f64 {
        self.record(0).heating_capacity_ratio
    }
}
