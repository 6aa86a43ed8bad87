use thiserror::Error;

/// Fatal configuration problems, raised once at load or sizing time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A smart-mixing wrapper lists no units.
    #[error("wrapper `{wrapper}` has no chiller-heater units")]
    NoUnits { wrapper: String },

    /// A component slot names a unit that was not supplied.
    #[error("wrapper `{wrapper}` references unknown unit `{unit}`")]
    UnknownUnit { wrapper: String, unit: String },

    /// A component slot asks for zero identical units.
    #[error("wrapper `{wrapper}` slot `{unit}` has an identical-unit count of zero")]
    IdenticalCount { wrapper: String, unit: String },

    /// Ancillary power below zero.
    #[error("wrapper `{wrapper}` ancillary power {value} W is negative")]
    AncillaryPower { wrapper: String, value: f64 },

    /// The wrapper control mode is not supported.
    #[error("wrapper `{wrapper}` uses unsupported control mode `{mode}`")]
    UnsupportedControlMode { wrapper: String, mode: String },

    /// A curve name could not be resolved.
    #[error("unit `{unit}` references unknown curve `{curve}`")]
    UnknownCurve { unit: String, curve: String },

    /// A reference value that must be strictly positive is not.
    #[error("unit `{unit}` {field} must be positive, got {value}")]
    NonPositiveReference {
        unit: String,
        field: &'static str,
        value: f64,
    },

    /// Open-motor efficiency outside `[0, 1]`.
    #[error("unit `{unit}` motor efficiency {value} is outside [0, 1]")]
    MotorEfficiency { unit: String, value: f64 },

    /// Only water-cooled condensers are modeled.
    #[error("unit `{unit}` condenser type `{condenser_type}` is not water-cooled")]
    CondenserType {
        unit: String,
        condenser_type: String,
    },

    /// The EIR-vs-PLR curve goes negative somewhere on `[0, 1]`.
    #[error("unit `{unit}` EIR part-load curve `{curve}` is negative at PLR {plr}")]
    NegativePartLoadEir {
        unit: String,
        curve: String,
        plr: f64,
    },

    /// An autosized value has no plant sizing data on its loop.
    #[error("unit `{unit}` autosizes {field} without plant sizing data")]
    AutosizeWithoutDesign { unit: String, field: &'static str },
}
