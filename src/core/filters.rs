use crate::core::dimensions::{meets_minimum, minimum_internal_dimensions};
use crate::models::{Case, CaseFilter, Gear, MatchOptions};

/// Build the catalog filter for a gear search
///
/// Every internal axis must clear the gear by the buffer margin; the
/// remaining constraints come straight from the search options.
pub fn build_case_filter(gear: &Gear, options: &MatchOptions) -> CaseFilter {
    CaseFilter {
        min_internal: Some(minimum_internal_dimensions(&gear.dimensions)),
        min_price: options.min_price,
        max_price: options.max_price,
        protection_level: options.protection_level,
        waterproof: options.waterproof,
        shockproof: options.shockproof,
        has_handle: options.require_handle.then_some(true),
        has_wheels: options.require_wheels.then_some(true),
        brands: options.brands.clone(),
    }
}

/// Check if a case satisfies the catalog filter
///
/// Catalog adapters that cannot push a constraint down to storage apply it here.
#[inline]
pub fn matches_case_filter(case: &Case, filter: &CaseFilter) -> bool {
    if let Some(minimum) = &filter.min_internal {
        if !meets_minimum(&case.internal_dimensions, minimum) {
            return false;
        }
    }

    if let Some(min_price) = filter.min_price {
        if case.price.is_nan() || case.price < min_price {
            return false;
        }
    }

    if let Some(max_price) = filter.max_price {
        if case.price.is_nan() || case.price > max_price {
            return false;
        }
    }

    if filter.protection_level.is_some_and(|level| level != case.protection_level) {
        return false;
    }

    if filter.waterproof.is_some_and(|wanted| wanted != case.waterproof)
        || filter.shockproof.is_some_and(|wanted| wanted != case.shockproof)
        || filter.has_handle.is_some_and(|wanted| wanted != case.has_handle)
        || filter.has_wheels.is_some_and(|wanted| wanted != case.has_wheels)
    {
        return false;
    }

    if !filter.brands.is_empty()
        && !filter.brands.iter().any(|brand| brand.eq_ignore_ascii_case(&case.brand))
    {
        return false;
    }

    true
}

/// Apply brand allow and deny lists to a case
///
/// An empty allow list admits every brand.
#[inline]
pub fn passes_brand_lists(case: &Case, include: &[String], exclude: &[String]) -> bool {
    let listed = |brands: &[String]| brands.iter().any(|brand| brand.eq_ignore_ascii_case(&case.brand));

    (include.is_empty() || listed(include)) && !listed(exclude)
}
