//! Operating schedules supplied by the host.

/// Handle to a host schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId(pub usize);

/// Current-value lookup for host schedules.
pub trait ScheduleLookup {
    /// Returns the schedule value for the current timestep.
    fn value(&self, id: ScheduleId) -> f64;

    /// A missing schedule means always available; otherwise any positive value.
    fn is_active(&self, id: Option<ScheduleId>) -> bool {
        id.is_none_or(|id| self.value(id) > 0.0)
    }
}

impl<F: Fn(ScheduleId) -> f64> ScheduleLookup for F {
    fn value(&self, id: ScheduleId) -> f64 {
        self(id)
    }
}

/// Lookup that reports every schedule as fully on.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOn;

impl ScheduleLookup for AlwaysOn {
    fn value(&self, _id: ScheduleId) -> f64 {
        1.0
    }
}

/// Schedule values for one timestep, indexed by [`ScheduleId`].
///
/// An id past the end reads as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleValues(pub Vec<f64>);

impl ScheduleLookup for ScheduleValues {
    fn value(&self, id: ScheduleId) -> f64 {
        self.0.get(id.0).copied().unwrap_or(0.0)
    }
}
