//! Unit operating modes and what each one reads from the cooling pass.

/// Operating mode of one unit instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitMode {
    #[default]
    Off,
    CoolingOnly,
    HeatingOnly,
    /// One compressor cycle serves both the chilled and hot water loops.
    HeatRecovery,
    /// Cooling only while other units recover heat.
    CoolingWhileRecovery,
    /// Heating only while other units recover heat.
    HeatingWhileRecovery,
}

/// Which side's duty is solved for in a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    None,
    Evaporator,
    Condenser,
}

/// Cooling-pass results that a heating-pass mode copies without change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotField {
    PartLoad,
    CurveOutputs,
    Evaporator,
    Condenser,
    /// Compressor power computed by the cooling pass.
    CoolingPower,
}

/// Static description of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRole {
    pub authority: Authority,
    /// Fields taken verbatim from the cooling-pass snapshot.
    pub reads_snapshot: &'static [SnapshotField],
}

impl UnitMode {
    /// Numeric code used in reports.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::CoolingOnly => 1,
            Self::HeatingOnly => 2,
            Self::HeatRecovery => 3,
            Self::CoolingWhileRecovery => 4,
            Self::HeatingWhileRecovery => 5,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::CoolingOnly),
            2 => Some(Self::HeatingOnly),
            3 => Some(Self::HeatRecovery),
            4 => Some(Self::CoolingWhileRecovery),
            5 => Some(Self::HeatingWhileRecovery),
            _ => None,
        }
    }

    #[must_use]
    pub const fn role(self) -> ModeRole {
        use SnapshotField::{Condenser, CoolingPower, CurveOutputs, Evaporator, PartLoad};

        match self {
            Self::Off => ModeRole {
                authority: Authority::None,
                reads_snapshot: &[],
            },
            Self::CoolingOnly => ModeRole {
                authority: Authority::Evaporator,
                reads_snapshot: &[],
            },
            Self::HeatingOnly | Self::HeatingWhileRecovery => ModeRole {
                authority: Authority::Condenser,
                reads_snapshot: &[],
            },
            Self::HeatRecovery => ModeRole {
                authority: Authority::Condenser,
                reads_snapshot: &[PartLoad, CurveOutputs, Evaporator, CoolingPower],
            },
            Self::CoolingWhileRecovery => ModeRole {
                authority: Authority::Evaporator,
                reads_snapshot: &[PartLoad, CurveOutputs, Evaporator, Condenser, CoolingPower],
            },
        }
    }

    /// Whether the unit runs at all.
    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Whether the mode exists only while the wrapper recovers heat.
    #[must_use]
    pub const fn is_simultaneous(self) -> bool {
        matches!(
            self,
            Self::HeatRecovery | Self::CoolingWhileRecovery | Self::HeatingWhileRecovery
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in 0..=5 {
            let mode = UnitMode::from_code(code).expect("valid code");
            assert_eq!(mode.code(), code);
        }
        assert!(UnitMode::from_code(6).is_none());
    }

    #[test]
    fn only_recovery_modes_read_the_snapshot() {
        for code in 0..=5 {
            let mode = UnitMode::from_code(code).expect("valid code");
            let reads = !mode.role().reads_snapshot.is_empty();
            assert_eq!(
                reads,
                matches!(mode, UnitMode::HeatRecovery | UnitMode::CoolingWhileRecovery)
            );
        }
    }
}
