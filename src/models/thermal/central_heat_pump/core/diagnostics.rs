//! Non-fatal diagnostics with throttling.
//!
//! A recurring condition (for example a capacity curve driven negative every
//! timestep of a heat wave) is logged in full the first time it occurs for a
//! given component. Later occurrences are only counted, along with the range
//! of the offending value, and can be summarized at the end of a run.

use std::collections::HashMap;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Severe,
}

/// Throttling key for a recurring condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Capacity-ratio curve output below zero; clamped to zero.
    NegativeCapacityRatio,
    /// Condenser flow at or below tolerance while duty must be rejected.
    CondenserFlowStarved,
    /// Reference heating leaving temperature below the hot-water inlet.
    NegativeHeatingDeltaT,
    /// Unrecognized flow-mode string; constant flow assumed.
    UnknownFlowMode,
    /// Unrecognized condenser temperature basis; leaving assumed.
    UnknownCondenserBasis,
    /// Units in one wrapper disagree on flow mode; constant flow forced.
    FlowModeMismatch,
    /// Curve output more than 10 % away from 1.0 at reference conditions.
    ReferenceCurveDeviation,
    /// Outlet node has no temperature setpoint; loop setpoint used.
    MissingSetpoint,
}

impl DiagnosticKind {
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::NegativeCapacityRatio
            | Self::FlowModeMismatch
            | Self::ReferenceCurveDeviation
            | Self::MissingSetpoint => Severity::Warning,
            Self::CondenserFlowStarved
            | Self::NegativeHeatingDeltaT
            | Self::UnknownFlowMode
            | Self::UnknownCondenserBasis => Severity::Severe,
        }
    }
}

/// A single non-fatal condition raised by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeDiagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Unit, curve or wrapper the condition belongs to.
    pub component: String,
    /// Offending value, tracked for the recurring summary.
    pub value: Option<f64>,
    pub message: String,
}

impl RuntimeDiagnostic {
    #[must_use]
    pub fn new(kind: DiagnosticKind, component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            component: component.into(),
            value: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// End-of-run summary of one recurring condition.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticSummary {
    pub kind: DiagnosticKind,
    pub component: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default)]
struct Recurrence {
    count: usize,
    min: Option<f64>,
    max: Option<f64>,
}

impl Recurrence {
    fn observe(&mut self, value: Option<f64>) {
        self.count += 1;
        if let Some(value) = value {
            self.min = Some(self.min.map_or(value, |min| min.min(value)));
            self.max = Some(self.max.map_or(value, |max| max.max(value)));
        }
    }
}

/// Collects diagnostics and throttles recurring ones.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticLog {
    suppressed: bool,
    first: Vec<RuntimeDiagnostic>,
    recurring: HashMap<(DiagnosticKind, String), Recurrence>,
}

impl DiagnosticLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores all diagnostics while set, as during warm-up iterations.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    /// Records a diagnostic.
    ///
    /// Returns `true` when this is the first occurrence for its kind and
    /// component, which is the only time it is emitted.
    pub fn record(&mut self, diagnostic: RuntimeDiagnostic) -> bool {
        if self.suppressed {
            return false;
        }

        let key = (diagnostic.kind, diagnostic.component.clone());
        let recurrence = self.recurring.entry(key).or_default();
        recurrence.observe(diagnostic.value);
        if recurrence.count > 1 {
            return false;
        }

        match diagnostic.severity {
            Severity::Warning => tracing::warn!(
                kind = ?diagnostic.kind,
                component = %diagnostic.component,
                value = ?diagnostic.value,
                "{}",
                diagnostic.message
            ),
            Severity::Severe => tracing::error!(
                kind = ?diagnostic.kind,
                component = %diagnostic.component,
                value = ?diagnostic.value,
                "{}",
                diagnostic.message
            ),
        }
        self.first.push(diagnostic);
        true
    }

    /// Diagnostics emitted so far, one per kind and component.
    #[must_use]
    pub fn emitted(&self) -> &[RuntimeDiagnostic] {
        &self.first
    }

    /// Number of times a condition has occurred for a component.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind, component: &str) -> usize {
        self.recurring
            .get(&(kind, component.to_owned()))
            .map_or(0, |recurrence| recurrence.count)
    }

    /// Returns `true` if any emitted diagnostic has the given kind.
    #[must_use]
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.first.iter().any(|diagnostic| diagnostic.kind == kind)
    }

    /// Summaries of every condition that occurred more than once.
    #[must_use]
    pub fn summaries(&self) -> Vec<DiagnosticSummary> {
        let mut summaries: Vec<_> = self
            .recurring
            .iter()
            .filter(|(_, recurrence)| recurrence.count > 1)
            .map(|((kind, component), recurrence)| DiagnosticSummary {
                kind: *kind,
                component: component.clone(),
                count: recurrence.count,
                min: recurrence.min,
                max: recurrence.max,
            })
            .collect();
        summaries.sort_by(|a, b| a.component.cmp(&b.component));
        summaries
    }

    /// Emits the recurring summaries at info level.
    pub fn flush_summaries(&self) {
        for summary in self.summaries() {
            tracing::info!(
                kind = ?summary.kind,
                component = %summary.component,
                count = summary.count,
                min = ?summary.min,
                max = ?summary.max,
                "recurring condition"
            );
        }
    }
}
