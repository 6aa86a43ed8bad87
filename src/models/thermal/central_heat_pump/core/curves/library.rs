use super::{CurveId, PerformanceCurves};

/// Polynomial form of a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveShape {
    /// `f = c`
    Constant(f64),

    /// `f = c0 + c1·x + c2·x²`
    Quadratic([f64; 3]),

    /// `f = c0 + c1·x + c2·x² + c3·x³`
    Cubic([f64; 4]),

    /// `f = c0 + c1·x + c2·x² + c3·y + c4·y² + c5·x·y`
    Biquadratic([f64; 6]),
}

/// A named performance curve with input limits.
///
/// Inputs are clamped to the limits before evaluation. The output is
/// returned unclamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    shape: CurveShape,
    x_limits: (f64, f64),
    y_limits: (f64, f64),
}

impl Curve {
    #[must_use]
    pub fn new(shape: CurveShape) -> Self {
        Self {
            shape,
            x_limits: (f64::NEG_INFINITY, f64::INFINITY),
            y_limits: (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(CurveShape::Constant(value))
    }

    #[must_use]
    pub fn quadratic(coefficients: [f64; 3]) -> Self {
        Self::new(CurveShape::Quadratic(coefficients))
    }

    #[must_use]
    pub fn cubic(coefficients: [f64; 4]) -> Self {
        Self::new(CurveShape::Cubic(coefficients))
    }

    #[must_use]
    pub fn biquadratic(coefficients: [f64; 6]) -> Self {
        Self::new(CurveShape::Biquadratic(coefficients))
    }

    /// Restricts the first input to `[min, max]`.
    #[must_use]
    pub fn with_x_limits(mut self, min: f64, max: f64) -> Self {
        self.x_limits = (min, max);
        self
    }

    /// Restricts the second input to `[min, max]`.
    #[must_use]
    pub fn with_y_limits(mut self, min: f64, max: f64) -> Self {
        self.y_limits = (min, max);
        self
    }

    #[must_use]
    pub fn shape(&self) -> CurveShape {
        self.shape
    }

    #[must_use]
    pub fn x_limits(&self) -> (f64, f64) {
        self.x_limits
    }

    /// Evaluates the curve at `(x, y)`; one-variable shapes ignore `y`.
    #[must_use]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        let x = x.clamp(self.x_limits.0, self.x_limits.1);
        let y = y.clamp(self.y_limits.0, self.y_limits.1);

        match self.shape {
            CurveShape::Constant(c) => c,
            CurveShape::Quadratic([c0, c1, c2]) => c0 + x * (c1 + x * c2),
            CurveShape::Cubic([c0, c1, c2, c3]) => c0 + x * (c1 + x * (c2 + x * c3)),
            CurveShape::Biquadratic([c0, c1, c2, c3, c4, c5]) => {
                c0 + c1 * x + c2 * x * x + c3 * y + c4 * y * y + c5 * x * y
            }
        }
    }
}

/// In-memory collection of named curves.
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct CurveLibrary {
    names: Vec<String>,
    curves: Vec<Curve>,
}

impl CurveLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a curve, replacing any existing curve with the same name.
    pub fn insert(&mut self, name: impl Into<String>, curve: Curve) -> CurveId {
        let name = name.into();
        if let Some(id) = self.find(&name) {
            self.curves[id.index()] = curve;
            return id;
        }
        self.names.push(name);
        self.curves.push(curve);
        CurveId::new(self.curves.len() - 1)
    }

    /// Builder form of [`CurveLibrary::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, curve: Curve) -> Self {
        self.insert(name, curve);
        self
    }

    #[must_use]
    pub fn get(&self, id: CurveId) -> Option<&Curve> {
        self.curves.get(id.index())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl PerformanceCurves for CurveLibrary {
    fn find(&self, name: &str) -> Option<CurveId> {
        self.names
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(name))
            .map(CurveId::new)
    }

    fn evaluate(&self, id: CurveId, x: f64) -> f64 {
        self.get(id).map_or(f64::NAN, |curve| curve.value(x, 0.0))
    }

    fn evaluate2(&self, id: CurveId, x: f64, y: f64) -> f64 {
        self.get(id).map_or(f64::NAN, |curve| curve.value(x, y))
    }

    fn domain(&self, id: CurveId) -> (f64, f64) {
        self.get(id)
            .map_or((f64::NEG_INFINITY, f64::INFINITY), Curve::x_limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn names_resolve_case_insensitively() {
        let library = CurveLibrary::new()
            .with("CapFT", Curve::constant(1.0))
            .with("EirPlr", Curve::quadratic([0.2, 0.3, 0.5]));

        let id = library.find("eirplr").expect("curve should resolve");
        assert_eq!(id, CurveId::new(1));
        assert!(library.find("missing").is_none());
        assert_relative_eq!(library.evaluate(id, 1.0), 1.0);
    }

    #[test]
    fn inputs_are_clamped_outputs_are_not() {
        let mut library = CurveLibrary::new();
        let id = library.insert(
            "steep",
            Curve::quadratic([-1.0, 2.0, 0.0]).with_x_limits(0.0, 1.0),
        );

        // Clamped to x = 0, the output stays negative.
        assert_relative_eq!(library.evaluate(id, -3.0), -1.0);
        assert_relative_eq!(library.evaluate(id, 5.0), 1.0);
        assert_eq!(library.domain(id), (0.0, 1.0));
    }

    #[test]
    fn biquadratic_uses_both_inputs() {
        let library = CurveLibrary::new().with(
            "capft",
            Curve::biquadratic([1.0, 0.01, 0.0, -0.005, 0.0, 0.0])
                .with_x_limits(4.0, 12.0)
                .with_y_limits(20.0, 40.0),
        );
        let id = library.find("CAPFT").expect("curve should resolve");

        assert_relative_eq!(library.evaluate2(id, 6.67, 29.4), 1.0 + 0.0667 - 0.147);
        // Condenser temperature clamped to 40 °C.
        assert_relative_eq!(library.evaluate2(id, 6.67, 55.0), 1.0 + 0.0667 - 0.2);
    }

    #[test]
    fn unknown_handle_is_nan() {
        let library = CurveLibrary::new();
        assert!(library.evaluate(CurveId::new(3), 0.5).is_nan());
    }

    #[test]
    fn reinserting_replaces() {
        let mut library = CurveLibrary::new();
        let first = library.insert("a", Curve::constant(1.0));
        let second = library.insert("A", Curve::constant(2.0));
        assert_eq!(first, second);
        assert_eq!(library.len(), 1);
        assert_relative_eq!(library.evaluate(first, 0.0), 2.0);
    }
}
