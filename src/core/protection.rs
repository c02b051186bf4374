use crate::models::{Gear, GearCategory, ProtectionLevel};

/// Recommend a protection tier for a piece of gear
///
/// Rules are evaluated in priority order, substring checks ignore case:
/// 1. Synthesizer, Mixer, or category/type mentioning "analog" or "vintage" → high
/// 2. Drum Machine, Audio Interface, or type mentioning "digital" → medium
/// 3. Effects Pedal, or type mentioning "pedal" → low
/// 4. anything else → medium
pub fn recommended_protection(gear: &Gear) -> ProtectionLevel {
    let category = gear.category_kind();
    let category_text = gear.category.to_lowercase();
    let type_text = gear.gear_type.to_lowercase();

    let mentions = |needle: &str| category_text.contains(needle) || type_text.contains(needle);

    if matches!(category, GearCategory::Synthesizer | GearCategory::Mixer)
        || mentions("analog")
        || mentions("vintage")
    {
        ProtectionLevel::High
    } else if matches!(category, GearCategory::DrumMachine | GearCategory::AudioInterface)
        || type_text.contains("digital")
    {
        ProtectionLevel::Medium
    } else if category == GearCategory::EffectsPedal || type_text.contains("pedal") {
        ProtectionLevel::Low
    } else {
        ProtectionLevel::Medium
    }
}

/// Score a case's actual tier against the recommended tier (0-100)
#[inline]
pub fn protection_match_score(recommended: ProtectionLevel, actual: ProtectionLevel) -> f64 {
    use ProtectionLevel::*;

    match (recommended, actual) {
        (r, a) if r == a => 100.0,
        (High, Medium) | (Medium, High) => 75.0,
        (Medium, Low) | (Low, Medium) => 50.0,
        _ => 25.0,
    }
}

/// Protection sub-score for `gear` housed in a case of tier `actual`
#[inline]
pub fn protection_score(gear: &Gear, actual: ProtectionLevel) -> f64 {
    protection_match_score(recommended_protection(gear), actual)
}
