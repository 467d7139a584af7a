//! # Axes
//!
//! Numerical values a tool reports about the user's interaction, each taken from one of the
//! device's valuators and projected onto `[0, 1]`.
//!
//! X and Y are implicit and always assumed available. Everything else is advertised through
//! [`AvailableAxes`].

bitflags::bitflags! {
    /// Bitflags describing optional Axes. See [`Axis`] for descriptions.
    ///
    /// X and Y axes are implicit and always available.
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
    pub struct AvailableAxes: u8 {
        const PRESSURE = 1;
        const TILT = 2;
    }
}

impl AvailableAxes {
    /// The capability a valuator index implies, if any. Position axes imply nothing.
    #[must_use]
    pub fn from_valuator(number: u16) -> Self {
        match Axis::from_valuator(number) {
            Some(Axis::Pressure) => Self::PRESSURE,
            Some(Axis::TiltX | Axis::TiltY) => Self::TILT,
            Some(Axis::X | Axis::Y) | None => Self::empty(),
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    strum::EnumCount,
    PartialEq,
    Eq,
    Hash,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum Axis {
    /// Horizontal position across the active area, `0.0` being the left edge.
    X,
    /// Vertical position across the active area, `0.0` being the top edge.
    Y,
    /// How much force is applied, perpendicular to the pad surface.
    ///
    /// This does not correspond with any physical units of force and is often configurable via
    /// the tablet driver to have a non-linear response curve.
    Pressure,
    /// Left-right tilt. `0.5` is typically perpendicular, but this is up to the hardware.
    TiltX,
    /// Forward-back tilt.
    TiltY,
}
impl Axis {
    /// Fixed valuator layout used by tablet drivers.
    #[must_use]
    pub fn from_valuator(number: u16) -> Option<Self> {
        Some(match number {
            0 => Self::X,
            1 => Self::Y,
            2 => Self::Pressure,
            3 => Self::TiltX,
            4 => Self::TiltY,
            _ => return None,
        })
    }
    #[must_use]
    pub fn valuator(self) -> u16 {
        self as u16
    }
}

/// A pair of normalized values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}
impl From<Vec2> for [f32; 2] {
    fn from(value: Vec2) -> Self {
        [value.x, value.y]
    }
}
impl From<[f32; 2]> for Vec2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Raw bounds of a valuator, as last reported by the device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}
impl Range {
    /// `min == max` happens in practice. Such an axis cannot be projected.
    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !(self.min.is_finite() && self.max.is_finite()) || self.max <= self.min
    }
    #[must_use]
    pub fn normalize(self, value: f64) -> f32 {
        normalize(value, self.min, self.max)
    }
}

/// Project `value` from `[min, max]` onto `[0, 1]`.
///
/// Degenerate or non-finite ranges yield `0.0`, and out-of-range values are clamped, so
/// the result is never `NaN` and always within `[0, 1]`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn normalize(value: f64, min: f64, max: f64) -> f32 {
    if !value.is_finite() || (Range { min, max }).is_degenerate() {
        return 0.0;
    }
    (((value - min) / (max - min)).clamp(0.0, 1.0)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_endpoints() {
        assert_eq!(normalize(0.0, 0.0, 100.0), 0.0);
        assert_eq!(normalize(100.0, 0.0, 100.0), 1.0);
        assert_eq!(normalize(50.0, 0.0, 100.0), 0.5);
        assert_eq!(normalize(-512.0, -512.0, 511.0), 0.0);
        assert_eq!(normalize(511.0, -512.0, 511.0), 1.0);
    }

    #[test]
    fn normalize_within_unit_interval() {
        let (min, max) = (-64.0, 8191.0);
        let mut value = min;
        while value <= max {
            let n = normalize(value, min, max);
            assert!((0.0..=1.0).contains(&n), "{value} -> {n}");
            value += 37.5;
        }
    }

    #[test]
    fn normalize_degenerate_is_zero() {
        assert_eq!(normalize(5.0, 5.0, 5.0), 0.0);
        assert_eq!(normalize(5.0, 10.0, 0.0), 0.0);
        assert_eq!(normalize(f64::NAN, 0.0, 1.0), 0.0);
        assert_eq!(normalize(0.5, 0.0, f64::INFINITY), 0.0);
        assert!(Range { min: 3.0, max: 3.0 }.is_degenerate());
        assert!(!Range { min: 0.0, max: 3.0 }.is_degenerate());
    }

    #[test]
    fn normalize_clamps_out_of_range() {
        assert_eq!(normalize(150.0, 0.0, 100.0), 1.0);
        assert_eq!(normalize(-1.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn valuator_layout() {
        assert_eq!(Axis::from_valuator(0), Some(Axis::X));
        assert_eq!(Axis::from_valuator(2), Some(Axis::Pressure));
        assert_eq!(Axis::from_valuator(4), Some(Axis::TiltY));
        assert_eq!(Axis::from_valuator(5), None);
        assert_eq!(Axis::TiltX.valuator(), 3);

        assert_eq!(AvailableAxes::from_valuator(0), AvailableAxes::empty());
        assert_eq!(AvailableAxes::from_valuator(1), AvailableAxes::empty());
        assert_eq!(AvailableAxes::from_valuator(2), AvailableAxes::PRESSURE);
        assert_eq!(AvailableAxes::from_valuator(3), AvailableAxes::TILT);
        assert_eq!(AvailableAxes::from_valuator(4), AvailableAxes::TILT);
        assert_eq!(AvailableAxes::from_valuator(9), AvailableAxes::empty());
    }

    #[test]
    fn every_axis_has_a_valuator() {
        use strum::{EnumCount, IntoEnumIterator};

        assert_eq!(Axis::iter().count(), Axis::COUNT);
        for (idx, axis) in Axis::iter().enumerate() {
            assert_eq!(usize::from(axis.valuator()), idx, "{}", axis.as_ref());
            assert_eq!(Axis::from_valuator(axis.valuator()), Some(axis));
        }
    }
}
