use serde::{Deserialize, Serialize};

/// Unit of length used for gear and case dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "in", alias = "inches", alias = "inch")]
    Inches,
    #[serde(rename = "cm", alias = "centimeters")]
    Centimeters,
    #[serde(rename = "mm", alias = "millimeters")]
    Millimeters,
}

impl LengthUnit {
    /// Length of one unit expressed in inches
    #[inline]
    pub fn inches_per_unit(self) -> f64 {
        match self {
            LengthUnit::Inches => 1.0,
            LengthUnit::Centimeters => 1.0 / 2.54,
            LengthUnit::Millimeters => 1.0 / 25.4,
        }
    }

    /// Convert a length from this unit into `target`
    #[inline]
    pub fn convert(self, value: f64, target: LengthUnit) -> f64 {
        if self == target {
            return value;
        }
        value * self.inches_per_unit() / target.inches_per_unit()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Inches => "in",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "in" | "inch" | "inches" => Some(LengthUnit::Inches),
            "cm" | "centimeters" => Some(LengthUnit::Centimeters),
            "mm" | "millimeters" => Some(LengthUnit::Millimeters),
            _ => None,
        }
    }
}

/// Unit of mass used for gear and case weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MassUnit {
    #[default]
    #[serde(rename = "lb", alias = "lbs", alias = "pounds")]
    Pounds,
    #[serde(rename = "kg", alias = "kilograms")]
    Kilograms,
    #[serde(rename = "g", alias = "grams")]
    Grams,
    #[serde(rename = "oz", alias = "ounces")]
    Ounces,
}

impl MassUnit {
    #[inline]
    pub fn kilograms_per_unit(self) -> f64 {
        match self {
            MassUnit::Pounds => 0.453_592,
            MassUnit::Kilograms => 1.0,
            MassUnit::Grams => 0.001,
            MassUnit::Ounces => 0.028_349_5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MassUnit::Pounds => "lb",
            MassUnit::Kilograms => "kg",
            MassUnit::Grams => "g",
            MassUnit::Ounces => "oz",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lb" | "lbs" | "pounds" => Some(MassUnit::Pounds),
            "kg" | "kilograms" => Some(MassUnit::Kilograms),
            "g" | "grams" => Some(MassUnit::Grams),
            "oz" | "ounces" => Some(MassUnit::Ounces),
            _ => None,
        }
    }
}

/// Three-axis measurement with a shared unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64, unit: LengthUnit) -> Self {
        Self { length, width, height, unit }
    }

    /// Axes in length, width, height order
    #[inline]
    pub fn axes(&self) -> [f64; 3] {
        [self.length, self.width, self.height]
    }

    pub fn to_unit(&self, unit: LengthUnit) -> Dimensions {
        Dimensions {
            length: self.unit.convert(self.length, unit),
            width: self.unit.convert(self.width, unit),
            height: self.unit.convert(self.height, unit),
            unit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    #[serde(default)]
    pub unit: MassUnit,
}

impl Weight {
    pub fn new(value: f64, unit: MassUnit) -> Self {
        Self { value, unit }
    }

    /// Weight in kilograms, or `None` when the value is missing or nonsensical
    pub fn kilograms(&self) -> Option<f64> {
        if self.value.is_finite() && self.value > 0.0 {
            Some(self.value * self.unit.kilograms_per_unit())
        } else {
            None
        }
    }
}

/// Closed set of gear categories that drive category-specific rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GearCategory {
    Synthesizer,
    Mixer,
    DrumMachine,
    AudioInterface,
    EffectsPedal,
    Other,
}

impl GearCategory {
    /// Parse a free-text catalog label
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "synthesizer" | "synthesizers" | "synth" => GearCategory::Synthesizer,
            "mixer" | "mixers" => GearCategory::Mixer,
            "drummachine" | "drummachines" => GearCategory::DrumMachine,
            "audiointerface" | "audiointerfaces" => GearCategory::AudioInterface,
            "effectspedal" | "effectspedals" => GearCategory::EffectsPedal,
            _ => GearCategory::Other,
        }
    }
}

/// Ruggedness tier of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtectionLevel {
    Low,
    Medium,
    High,
}

impl ProtectionLevel {
    /// Next tier up; `High` saturates
    pub fn step_up(self) -> Self {
        match self {
            ProtectionLevel::Low => ProtectionLevel::Medium,
            ProtectionLevel::Medium | ProtectionLevel::High => ProtectionLevel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProtectionLevel::Low => "low",
            ProtectionLevel::Medium => "medium",
            ProtectionLevel::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(ProtectionLevel::Low),
            "medium" => Some(ProtectionLevel::Medium),
            "high" => Some(ProtectionLevel::High),
            _ => None,
        }
    }
}

/// Piece of audio equipment to be housed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gear {
    pub id: String,
    pub category: String,
    #[serde(rename = "type")]
    pub gear_type: String,
    pub brand: String,
    pub name: String,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub weight: Option<Weight>,
}

impl Gear {
    pub fn category_kind(&self) -> GearCategory {
        GearCategory::from_label(&self.category)
    }
}

/// Protective case from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "internalDimensions")]
    pub internal_dimensions: Dimensions,
    #[serde(default)]
    pub weight: Option<Weight>,
    #[serde(rename = "protectionLevel")]
    pub protection_level: ProtectionLevel,
    #[serde(default)]
    pub waterproof: bool,
    #[serde(default)]
    pub shockproof: bool,
    #[serde(rename = "hasHandle", default)]
    pub has_handle: bool,
    #[serde(rename = "hasWheels", default)]
    pub has_wheels: bool,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(rename = "reviewCount", default)]
    pub review_count: u32,
}

fn default_currency() -> String { "USD".to_string() }

impl Case {
    /// Price when it is usable for price-band comparisons
    pub fn known_price(&self) -> Option<f64> {
        (self.price.is_finite() && self.price > 0.0).then_some(self.price)
    }
}

/// Relation of a result to the primary match it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    #[default]
    Primary,
    Budget,
    Premium,
    AlternativeSize,
}

/// Per-axis and overall occupancy percentages
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionFit {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub overall: f64,
    /// Case dimensions were converted into the gear's unit before comparison
    #[serde(rename = "mixedUnits", default)]
    pub mixed_units: bool,
    /// At least one case axis was zero, negative or not a number
    #[serde(default)]
    pub degenerate: bool,
}

impl DimensionFit {
    #[inline]
    pub fn axes(&self) -> [f64; 3] {
        [self.length, self.width, self.height]
    }
}

/// Ranked case for a piece of gear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    #[serde(rename = "gearId")]
    pub gear_id: String,
    pub case: Case,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
    #[serde(rename = "dimensionFit")]
    pub dimension_fit: DimensionFit,
    #[serde(rename = "dimensionScore")]
    pub dimension_score: f64,
    #[serde(rename = "protectionScore")]
    pub protection_score: f64,
    #[serde(rename = "featureScore")]
    pub feature_score: f64,
    #[serde(rename = "ratingScore")]
    pub rating_score: f64,
    #[serde(rename = "recommendationType", default)]
    pub recommendation_type: RecommendationType,
    #[serde(rename = "confidenceScore", default)]
    pub confidence_score: u8,
}

/// Coarse price bracket stored with a match record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    Budget,
    MidRange,
    Premium,
}

impl PriceCategory {
    /// Bracket for a price; unknown (non-finite) prices fall in `Budget`
    pub fn from_price(price: f64) -> Self {
        if !price.is_finite() || price < 100.0 {
            PriceCategory::Budget
        } else if price < 300.0 {
            PriceCategory::MidRange
        } else {
            PriceCategory::Premium
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriceCategory::Budget => "budget",
            PriceCategory::MidRange => "mid_range",
            PriceCategory::Premium => "premium",
        }
    }
}

/// Persisted (gear, case) compatibility snapshot, upserted after every search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "gearId")]
    pub gear_id: String,
    #[serde(rename = "caseId")]
    pub case_id: String,
    #[serde(rename = "compatibilityScore")]
    pub compatibility_score: u8,
    #[serde(rename = "dimensionFit")]
    pub dimension_fit: DimensionFit,
    #[serde(rename = "priceCategory")]
    pub price_category: PriceCategory,
    #[serde(rename = "protectionLevel")]
    pub protection_level: ProtectionLevel,
    pub features: Vec<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl MatchRecord {
    pub fn from_match(scored: &ScoredMatch) -> Self {
        Self {
            gear_id: scored.gear_id.clone(),
            case_id: scored.case.id.clone(),
            compatibility_score: scored.compatibility_score,
            dimension_fit: scored.dimension_fit,
            price_category: scored
                .case
                .known_price()
                .map_or(PriceCategory::Budget, PriceCategory::from_price),
            protection_level: scored.case.protection_level,
            features: scored.case.features.clone(),
            updated_at: chrono::Utc::now(),
        }
    }
}

/// Catalog query built by the product matcher
///
/// Dimension thresholds are expressed in `min_internal.unit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseFilter {
    pub min_internal: Option<Dimensions>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub protection_level: Option<ProtectionLevel>,
    pub waterproof: Option<bool>,
    pub shockproof: Option<bool>,
    pub has_handle: Option<bool>,
    pub has_wheels: Option<bool>,
    pub brands: Vec<String>,
}

/// Field used to order a result page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CompatibilityScore,
    Price,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Scoring weights for the compatibility formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub dimension: f64,
    pub protection: f64,
    pub features: f64,
    pub rating: f64,
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.dimension + self.protection + self.features + self.rating
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            dimension: 0.40,
            protection: 0.25,
            features: 0.20,
            rating: 0.15,
        }
    }
}
