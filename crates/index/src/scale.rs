//! Linear scales and decision thresholds.

use serde::Serialize;

use crate::error::IndexError;

/// A linear mapping from a provider's units onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale {
    min: f64,
    max: f64,
}

impl Scale {
    /// The identity scale `[0, 1]`.
    pub const UNIT: Scale = Scale { min: 0.0, max: 1.0 };

    /// `[0, 50]` mm/day; 50 mm/day is where BMKG's heavy-rain class starts.
    pub const PRECIPITATION_MM_DAY: Scale = Scale { min: 0.0, max: 50.0 };

    pub fn new(min: f64, max: f64) -> Result<Self, IndexError> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(IndexError::InvalidScale { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Maps `value` onto `[0, 1]`, clamping outside the bounds.
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::UNIT
    }
}

/// The decision threshold, expressed on the deployment's own scale.
///
/// One deployment uses `0.7` on a `[0, 1]` scale, another `6` on `[0, 10]`.
/// Both compare against the normalized hazard value via
/// [`normalized`](Self::normalized).
///
/// ```
/// use hmhews_index::Threshold;
///
/// let t = Threshold::new(6.0, 10.0).unwrap();
/// assert_eq!(t.normalized(), 0.6);
/// assert!(t.is_exceeded_by(0.6));
/// assert!(!t.is_exceeded_by(0.59));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    value: f64,
    scale_max: f64,
}

impl Threshold {
    pub fn new(value: f64, scale_max: f64) -> Result<Self, IndexError> {
        if !scale_max.is_finite() || scale_max <= 0.0 {
            return Err(IndexError::InvalidScale {
                min: 0.0,
                max: scale_max,
            });
        }
        if !value.is_finite() || value < 0.0 || value > scale_max {
            return Err(IndexError::InvalidThreshold { value, scale_max });
        }
        Ok(Self { value, scale_max })
    }

    /// A threshold on the unit scale.
    pub fn unit(value: f64) -> Result<Self, IndexError> {
        Self::new(value, 1.0)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn scale_max(&self) -> f64 {
        self.scale_max
    }

    /// The threshold mapped onto `[0, 1]`.
    pub fn normalized(&self) -> f64 {
        self.value / self.scale_max
    }

    /// Returns true when a normalized hazard value predicts a flood.
    pub fn is_exceeded_by(&self, hazard: f64) -> bool {
        hazard >= self.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps() {
        let s = Scale::new(0.0, 50.0).unwrap();
        assert_eq!(s.normalize(25.0), 0.5);
        assert_eq!(s.normalize(-3.0), 0.0);
        assert_eq!(s.normalize(120.0), 1.0);
    }

    #[test]
    fn scale_rejects_inverted_bounds() {
        assert!(Scale::new(1.0, 1.0).is_err());
        assert!(Scale::new(2.0, 1.0).is_err());
        assert!(Scale::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn threshold_bounds() {
        assert!(Threshold::unit(0.0).is_ok());
        assert!(Threshold::unit(1.0).is_ok());
        assert_eq!(
            Threshold::unit(1.2),
            Err(IndexError::InvalidThreshold {
                value: 1.2,
                scale_max: 1.0
            })
        );
        assert!(Threshold::new(-0.1, 10.0).is_err());
        assert!(Threshold::new(f64::NAN, 10.0).is_err());
        assert!(Threshold::new(5.0, 0.0).is_err());
    }

    #[test]
    fn zero_threshold_accepts_everything() {
        let t = Threshold::unit(0.0).unwrap();
        assert!(t.is_exceeded_by(0.0));
    }

    #[test]
    fn full_threshold_needs_perfect_score() {
        let t = Threshold::new(10.0, 10.0).unwrap();
        assert!(t.is_exceeded_by(1.0));
        assert!(!t.is_exceeded_by(0.999));
    }
}
