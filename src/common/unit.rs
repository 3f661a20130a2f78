//! Unit conversion utilities.
//!
//! Layout math runs in points (`f64`). The portable writer stores English Metric
//! Units, the native host takes points directly, so every conversion goes
//! through here to keep both backends on identical coordinates.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;
pub const POINTS_PER_INCH: f64 = 72.0;

/// OOXML angles are expressed in 60000ths of a degree.
pub const ANGLE_UNITS_PER_DEGREE: f64 = 60_000.0;

/// Fractions (alpha, gradient positions) are expressed in 1000ths of a percent.
pub const PERCENT_UNITS: f64 = 100_000.0;

#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

#[inline]
pub fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

#[inline]
pub fn inch_to_pt(inches: f64) -> f64 {
    inches * POINTS_PER_INCH
}

#[inline]
pub fn degrees_to_angle_units(degrees: f64) -> i64 {
    (degrees.rem_euclid(360.0) * ANGLE_UNITS_PER_DEGREE).round() as i64
}

#[inline]
pub fn fraction_to_percent_units(fraction: f64) -> i64 {
    (fraction.clamp(0.0, 1.0) * PERCENT_UNITS).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_emu_round_trip_is_exact_on_whole_points() {
        assert_eq!(pt_to_emu(960.0), 12_192_000);
        assert_eq!(pt_to_emu(540.0), 6_858_000);
        assert_eq!(emu_to_pt(pt_to_emu(72.0)), 72.0);
        assert_eq!(pt_to_emu(inch_to_pt(1.0)), EMUS_PER_INCH);
    }

    #[test]
    fn test_pt_to_emu_rounds_fractional_points() {
        // 0.5pt = 6350 EMU exactly, a third of a point rounds
        assert_eq!(pt_to_emu(0.5), 6_350);
        assert_eq!(pt_to_emu(1.0 / 3.0), 4_233);
    }

    #[test]
    fn test_angle_and_percent_units() {
        assert_eq!(degrees_to_angle_units(90.0), 5_400_000);
        assert_eq!(degrees_to_angle_units(-90.0), 16_200_000);
        assert_eq!(fraction_to_percent_units(0.6), 60_000);
        assert_eq!(fraction_to_percent_units(1.7), 100_000);
    }
}
