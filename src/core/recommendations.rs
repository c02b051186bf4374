use crate::core::{
    confidence,
    dimensions::differs_on_any_axis,
    filters::passes_brand_lists,
    matcher::{sort_matches, MatchError, ProductMatcher},
};
use crate::models::{
    Gear, MatchOptions, RecommendationOptions, RecommendationType, ScoredMatch, SortField,
    SortOrder,
};

/// Cheapest acceptable budget alternative, as a fraction of the primary price
pub const BUDGET_FLOOR_RATIO: f64 = 0.6;
/// Upper end of the budget query band
pub const BUDGET_CEILING_RATIO: f64 = 0.9;
/// Minimum premium upgrade price, as a fraction of the primary price
pub const PREMIUM_FLOOR_RATIO: f64 = 1.1;
/// Relative axis difference that makes a case a different form factor
pub const SIZE_DIFFERENCE_RATIO: f64 = 0.2;

const BUDGET_LIMIT: usize = 3;
const PREMIUM_LIMIT: usize = 3;
const SIZE_LIMIT: usize = 5;

/// Derives budget, premium and alternative-size suggestions around a primary match
///
/// Each sub-search is a full run of the product matcher with adjusted
/// options, so its results are persisted like any other search.
#[derive(Clone)]
pub struct RecommendationEngine {
    matcher: ProductMatcher,
}

impl RecommendationEngine {
    pub fn new(matcher: ProductMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &ProductMatcher {
        &self.matcher
    }

    /// Merge the enabled sub-searches into one ranked list
    ///
    /// Results are tagged with their recommendation type, filtered by the
    /// brand lists, ordered by compatibility (descending) and truncated to
    /// `options.max_alternatives`.
    pub async fn generate_alternative_recommendations(
        &self,
        gear: &Gear,
        primary: &ScoredMatch,
        options: &RecommendationOptions,
    ) -> Result<Vec<ScoredMatch>, MatchError> {
        let budget = async {
            if options.include_budget {
                self.find_budget_alternatives(gear, primary).await
            } else {
                Ok(Vec::new())
            }
        };
        let premium = async {
            if options.include_premium {
                self.find_premium_upgrades(gear, primary, options.max_price_difference_percent)
                    .await
            } else {
                Ok(Vec::new())
            }
        };
        let sizes = async {
            if options.include_alternative_sizes {
                self.find_size_alternatives(gear, primary).await
            } else {
                Ok(Vec::new())
            }
        };

        let (budget, premium, sizes) = tokio::join!(budget, premium, sizes);
        let (budget, premium, sizes) = (budget?, premium?, sizes?);

        tracing::debug!(
            "Recommendations for gear {}: {} budget, {} premium, {} size",
            gear.id,
            budget.len(),
            premium.len(),
            sizes.len()
        );

        let mut recommendations: Vec<ScoredMatch> = tag(budget, RecommendationType::Budget)
            .chain(tag(premium, RecommendationType::Premium))
            .chain(tag(sizes, RecommendationType::AlternativeSize))
            .filter(|scored| {
                passes_brand_lists(&scored.case, &options.include_brands, &options.exclude_brands)
            })
            .collect();

        sort_matches(
            &mut recommendations,
            SortField::CompatibilityScore,
            SortOrder::Desc,
        );
        recommendations.truncate(options.max_alternatives);

        tracing::info!(
            "Generated {} alternative recommendations for gear {} (primary case {})",
            recommendations.len(),
            gear.id,
            primary.case.id
        );

        Ok(recommendations)
    }

    /// Cheaper cases at the primary's protection level
    ///
    /// Keeps cases priced in [60%, 90%) of the primary. The catalog filter's
    /// ceiling is inclusive, so the upper bound is re-checked here.
    pub async fn find_budget_alternatives(
        &self,
        gear: &Gear,
        primary: &ScoredMatch,
    ) -> Result<Vec<ScoredMatch>, MatchError> {
        let Some(price) = primary.case.known_price() else {
            return Ok(Vec::new());
        };
        let floor = price * BUDGET_FLOOR_RATIO;
        let ceiling = price * BUDGET_CEILING_RATIO;

        let options = MatchOptions {
            min_price: Some(floor),
            max_price: Some(ceiling),
            protection_level: Some(primary.case.protection_level),
            sort_by: SortField::Price,
            sort_order: SortOrder::Asc,
            max_results: BUDGET_LIMIT,
            ..MatchOptions::default()
        };

        let matches = self.matcher.find_compatible_cases(gear.clone(), &options).await?;

        Ok(matches
            .into_iter()
            .filter(|scored| scored.case.price >= floor && scored.case.price < ceiling)
            .collect())
    }

    /// More expensive cases one protection tier up
    ///
    /// Results are priced between 110% of the primary and the primary plus
    /// `max_price_difference_percent`.
    pub async fn find_premium_upgrades(
        &self,
        gear: &Gear,
        primary: &ScoredMatch,
        max_price_difference_percent: f64,
    ) -> Result<Vec<ScoredMatch>, MatchError> {
        let Some(price) = primary.case.known_price() else {
            return Ok(Vec::new());
        };
        let floor = price * PREMIUM_FLOOR_RATIO;
        let ceiling = price * (1.0 + max_price_difference_percent / 100.0);
        if !ceiling.is_finite() || ceiling < floor {
            return Ok(Vec::new());
        }

        let options = MatchOptions {
            min_price: Some(floor),
            max_price: Some(ceiling),
            protection_level: Some(primary.case.protection_level.step_up()),
            sort_by: SortField::CompatibilityScore,
            sort_order: SortOrder::Desc,
            max_results: PREMIUM_LIMIT,
            ..MatchOptions::default()
        };

        let matches = self.matcher.find_compatible_cases(gear.clone(), &options).await?;

        Ok(matches
            .into_iter()
            .filter(|scored| scored.case.price >= floor && scored.case.price <= ceiling)
            .collect())
    }

    /// Top compatible cases whose shape differs meaningfully from the primary
    pub async fn find_size_alternatives(
        &self,
        gear: &Gear,
        primary: &ScoredMatch,
    ) -> Result<Vec<ScoredMatch>, MatchError> {
        let options = MatchOptions {
            sort_by: SortField::CompatibilityScore,
            sort_order: SortOrder::Desc,
            max_results: SIZE_LIMIT,
            ..MatchOptions::default()
        };

        let matches = self.matcher.find_compatible_cases(gear.clone(), &options).await?;
        let reference = &primary.case.internal_dimensions;

        Ok(matches
            .into_iter()
            .filter(|scored| scored.case.id != primary.case.id)
            .filter(|scored| {
                differs_on_any_axis(&scored.case.internal_dimensions, reference, SIZE_DIFFERENCE_RATIO)
            })
            .collect())
    }

    pub fn calculate_confidence_score(&self, gear: &Gear, scored: &ScoredMatch) -> u8 {
        confidence::calculate_confidence_score(gear, scored)
    }
}

fn tag(
    matches: Vec<ScoredMatch>,
    recommendation_type: RecommendationType,
) -> impl Iterator<Item = ScoredMatch> {
    matches.into_iter().map(move |mut scored| {
        scored.recommendation_type = recommendation_type;
        scored
    })
}
