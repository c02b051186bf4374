//! Ordered keyword detection over a case's free text.
//!
//! A rule matches when any of its keywords is a case-insensitive substring of
//! one of the case's text sources. Sources are searched in a fixed order
//! (description, then each feature tag in catalog order, then name) and
//! keywords in declaration order within each source; the first hit wins.

use crate::models::Case;

/// Named set of keywords that detects one case attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const PADDING: KeywordRule = KeywordRule {
    name: "padding",
    keywords: &["padded", "padding", "foam", "cushion", "soft interior", "plush"],
};

pub const COMPARTMENTS: KeywordRule = KeywordRule {
    name: "compartments",
    keywords: &["compartment", "pocket", "divider", "section", "organizer"],
};

pub const PEDALBOARD: KeywordRule = KeywordRule {
    name: "pedalboard",
    keywords: &["pedalboard", "pedal board"],
};

pub const HOOK_AND_LOOP: KeywordRule = KeywordRule {
    name: "hook_and_loop",
    keywords: &["velcro", "hook and loop", "hook-and-loop"],
};

pub const POWER_SUPPLY: KeywordRule = KeywordRule {
    name: "power_supply",
    keywords: &["power supply", "power brick", "psu"],
};

pub const CABLE_COMPARTMENT: KeywordRule = KeywordRule {
    name: "cable_compartment",
    keywords: &["cable compartment", "cable pocket", "cable storage", "cable organizer"],
};

/// Where in the case a keyword was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Description,
    FeatureTag(usize),
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordHit {
    pub rule: &'static str,
    pub keyword: &'static str,
    pub source: TextSource,
}

impl KeywordRule {
    /// First keyword of this rule found in `text`, ignoring case
    pub fn find_in(&self, text: &str) -> Option<&'static str> {
        let haystack = text.to_lowercase();
        self.keywords.iter().copied().find(|keyword| haystack.contains(keyword))
    }

    /// Search the case's text sources in precedence order
    pub fn detect(&self, case: &Case) -> Option<KeywordHit> {
        text_sources(case).find_map(|(source, text)| {
            self.find_in(text).map(|keyword| KeywordHit {
                rule: self.name,
                keyword,
                source,
            })
        })
    }

    #[inline]
    pub fn matches(&self, case: &Case) -> bool {
        self.detect(case).is_some()
    }
}

/// The case's searchable text, in precedence order
pub fn text_sources(case: &Case) -> impl Iterator<Item = (TextSource, &str)> {
    let description = case
        .description
        .as_deref()
        .map(|text| (TextSource::Description, text));

    let tags = case
        .features
        .iter()
        .enumerate()
        .map(|(index, tag)| (TextSource::FeatureTag(index), tag.as_str()));

    description
        .into_iter()
        .chain(tags)
        .chain(std::iter::once((TextSource::Name, case.name.as_str())))
}

/// Case-insensitive substring test against any of `candidates`
///
/// An empty candidate list never matches.
pub fn contains_any(text: Option<&str>, candidates: &[String]) -> bool {
    let Some(text) = text else {
        return false;
    };
    let haystack = text.to_lowercase();
    candidates
        .iter()
        .map(|candidate| candidate.trim().to_lowercase())
        .any(|needle| !needle.is_empty() && haystack.contains(&needle))
}
