use crate::models::{DimensionFit, Dimensions};

/// Minimum clearance between a gear dimension and the case interior, in the gear's unit
pub const BUFFER_MARGIN: f64 = 0.5;

/// Lower edge of the ideal occupancy band, in percent
pub const IDEAL_FIT_MIN: f64 = 70.0;
/// Upper edge of the ideal occupancy band, in percent
pub const IDEAL_FIT_MAX: f64 = 90.0;

/// Calculate per-axis and overall occupancy of `case_dims` by `gear_dims`
///
/// Case dimensions are converted into the gear's unit first. Each axis is
/// `gear / case * 100`; overall is the mean of the three axes.
///
/// A case axis that is zero, negative or not finite cannot be divided by:
/// that axis reports 0 and the fit is marked `degenerate`, which grades to 0.
pub fn calculate_dimension_fit(gear_dims: &Dimensions, case_dims: &Dimensions) -> DimensionFit {
    let mixed_units = gear_dims.unit != case_dims.unit;
    if mixed_units {
        tracing::warn!(
            "Mixed length units: gear in {}, case in {}; converting case dimensions",
            gear_dims.unit.as_str(),
            case_dims.unit.as_str()
        );
    }

    let case_dims = case_dims.to_unit(gear_dims.unit);
    let mut degenerate = false;

    let [length, width, height] = {
        let gear_axes = gear_dims.axes();
        let case_axes = case_dims.axes();
        let mut fits = [0.0; 3];
        for (fit, (gear, case)) in fits.iter_mut().zip(gear_axes.iter().zip(case_axes.iter())) {
            match axis_fit(*gear, *case) {
                Some(value) => *fit = value,
                None => degenerate = true,
            }
        }
        fits
    };

    DimensionFit {
        length,
        width,
        height,
        overall: (length + width + height) / 3.0,
        mixed_units,
        degenerate,
    }
}

#[inline]
fn axis_fit(gear: f64, case: f64) -> Option<f64> {
    if !case.is_finite() || case <= 0.0 {
        return None;
    }
    let gear = if gear.is_finite() { gear.max(0.0) } else { 0.0 };
    Some(gear / case * 100.0)
}

/// Grade an overall occupancy percentage (0-100)
///
/// - 70..=90 is ideal and scores 100
/// - below 70 ramps linearly from 70 (empty) to 100 (at 70%)
/// - above 90 loses 10 points per percent, reaching 0 at 100%
/// - above 100 the gear does not fit and scores 0
#[inline]
pub fn grade_overall_fit(overall: f64) -> f64 {
    if !overall.is_finite() || overall > 100.0 {
        0.0
    } else if overall > IDEAL_FIT_MAX {
        100.0 - (overall - IDEAL_FIT_MAX) * 10.0
    } else if overall >= IDEAL_FIT_MIN {
        100.0
    } else {
        70.0 + (overall.max(0.0) / IDEAL_FIT_MIN) * 30.0
    }
}

/// Dimension sub-score for the compatibility formula
#[inline]
pub fn dimension_score(fit: &DimensionFit) -> f64 {
    if fit.degenerate {
        return 0.0;
    }
    grade_overall_fit(fit.overall)
}

/// Stricter per-axis grade used by the confidence estimate
///
/// 75-90 → 100, 70-75 or 90-95 → 80, 60-70 or 95-100 → 60, anything else → 30.
#[inline]
pub fn grade_axis_strict(fit: f64) -> f64 {
    if (75.0..=90.0).contains(&fit) {
        100.0
    } else if (70.0..75.0).contains(&fit) || (fit > 90.0 && fit <= 95.0) {
        80.0
    } else if (60.0..70.0).contains(&fit) || (fit > 95.0 && fit <= 100.0) {
        60.0
    } else {
        30.0
    }
}

/// Minimum internal dimensions a case needs to hold the gear, including the buffer
pub fn minimum_internal_dimensions(gear_dims: &Dimensions) -> Dimensions {
    Dimensions {
        length: gear_dims.length + BUFFER_MARGIN,
        width: gear_dims.width + BUFFER_MARGIN,
        height: gear_dims.height + BUFFER_MARGIN,
        unit: gear_dims.unit,
    }
}

/// Check whether `case_dims` meets `minimum` on every axis
#[inline]
pub fn meets_minimum(case_dims: &Dimensions, minimum: &Dimensions) -> bool {
    let case_dims = case_dims.to_unit(minimum.unit);
    case_dims
        .axes()
        .iter()
        .zip(minimum.axes().iter())
        .all(|(case, min)| *case >= *min)
}

/// Check whether any axis of `candidate` differs from `reference` by more than `ratio`
/// of the reference value
pub fn differs_on_any_axis(candidate: &Dimensions, reference: &Dimensions, ratio: f64) -> bool {
    let candidate = candidate.to_unit(reference.unit);
    candidate
        .axes()
        .iter()
        .zip(reference.axes().iter())
        .any(|(value, base)| *base > 0.0 && ((value - base).abs() / base) > ratio)
}
