//! Deficit extraction: turns a room's violations into "N missing items"
//! records such as `"3 sockets"` or `"1 network socket"`.
//!
//! Violations carrying a structured [`EquipmentRequirement`] are used as-is.
//! Messages without one are parsed best-effort (French and English
//! phrasings); anything unparsable is skipped.
//!
//! [`EquipmentRequirement`]: crate::model::EquipmentRequirement

use std::sync::LazyLock;

use regex::Regex;

use crate::classifier::{count_room_equipment, EquipmentCounts};
use crate::model::{DeficitCategory, EquipmentItem, RuleViolation};

/// "au moins N <phrase> (actuellement M)"
static WITH_CURRENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:au moins|at least)\s+(\d+)\s+(.+?)\s*\((?:actuellement|currently)\s+(\d+)\)")
        .expect("valid regex")
});

/// "au moins N <phrase>", "disposer d'un <phrase>", "must have a <phrase>"
static REQUIRED_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?:au moins|at least)\s+(\d+|une?|one|an?)|disposer d'une?|must have an?)\s+(.+?)(?:\s+(?:2p\+t|pour|conformément|au-dessus|près|for|in|according|near)\b|\s*[(.,;]|$)",
    )
    .expect("valid regex")
});

/// Tail of a captured phrase that is not part of the equipment name.
static PHRASE_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\s+(?:2p\+t|pour|conformément|au-dessus|près|for|in|according|near)\b|\s*[(.,;]).*$")
        .expect("valid regex")
});

/// Equipment phrases (normalized) and their category.
const LEXICON: &[(&str, DeficitCategory)] = &[
    ("prise réseau", DeficitCategory::NetworkSocket),
    ("prises réseau", DeficitCategory::NetworkSocket),
    ("prise rj45", DeficitCategory::NetworkSocket),
    ("prises rj45", DeficitCategory::NetworkSocket),
    ("network socket", DeficitCategory::NetworkSocket),
    ("network sockets", DeficitCategory::NetworkSocket),
    ("prise 32a plaque", DeficitCategory::Socket32A),
    ("prises 32a plaque", DeficitCategory::Socket32A),
    ("prise 32a", DeficitCategory::Socket32A),
    ("prises 32a", DeficitCategory::Socket32A),
    ("32a socket", DeficitCategory::Socket32A),
    ("32a sockets", DeficitCategory::Socket32A),
    ("prise", DeficitCategory::Socket),
    ("prises", DeficitCategory::Socket),
    ("prise de courant", DeficitCategory::Socket),
    ("prises de courant", DeficitCategory::Socket),
    ("socket", DeficitCategory::Socket),
    ("sockets", DeficitCategory::Socket),
    ("point lumineux", DeficitCategory::LightingPoint),
    ("points lumineux", DeficitCategory::LightingPoint),
    ("point d'éclairage", DeficitCategory::LightingPoint),
    ("points d'éclairage", DeficitCategory::LightingPoint),
    ("éclairage", DeficitCategory::LightingPoint),
    ("lighting point", DeficitCategory::LightingPoint),
    ("lighting points", DeficitCategory::LightingPoint),
    ("interrupteur", DeficitCategory::Switch),
    ("interrupteurs", DeficitCategory::Switch),
    ("switch", DeficitCategory::Switch),
    ("switches", DeficitCategory::Switch),
];

/// Missing-equipment strings for one room.
pub fn extract_missing_equipment(
    violations: &[RuleViolation],
    equipment: &[EquipmentItem],
) -> Vec<String> {
    let counts = count_room_equipment(equipment);
    violations
        .iter()
        .filter_map(|v| deficit_for(v, &counts))
        .filter(|(_, delta)| *delta > 0)
        .map(|(category, delta)| category.describe(delta))
        .collect()
}

/// Category and shortfall for a single violation, if one can be derived.
pub fn deficit_for(
    violation: &RuleViolation,
    counts: &EquipmentCounts,
) -> Option<(DeficitCategory, u32)> {
    if let Some(requirement) = violation.requirement {
        return Some((requirement.category, requirement.shortfall()));
    }

    let text = normalize(&violation.message);

    if let Some(caps) = WITH_CURRENT.captures(&text) {
        let required: u32 = caps[1].parse().ok()?;
        let current: u32 = caps[3].parse().ok()?;
        let category = lookup_category(&caps[2]);
        tracing::debug!(
            "Deficit '{}': required {} current {} -> {:?}",
            violation.message,
            required,
            current,
            category
        );
        return category.map(|c| (c, required.saturating_sub(current)));
    }

    if let Some(caps) = REQUIRED_ONLY.captures(&text) {
        let required = caps.get(1).map_or(Some(1), |m| parse_count(m.as_str()))?;
        let category = lookup_category(&caps[2]);
        tracing::debug!(
            "Deficit '{}': required {} -> {:?}",
            violation.message,
            required,
            category
        );
        return category.map(|c| (c, required.saturating_sub(counts.get(c))));
    }

    if text.contains("prise réseau") || text.contains("network socket") {
        let delta = u32::from(counts.network_sockets == 0);
        return Some((DeficitCategory::NetworkSocket, delta));
    }

    tracing::debug!("No deficit derived from '{}'", violation.message);
    None
}

/// Category of an equipment phrase: exact entry first, then the longest
/// lexicon entry contained in the phrase.
pub fn lookup_category(phrase: &str) -> Option<DeficitCategory> {
    let phrase = normalize(phrase);
    let phrase = PHRASE_TAIL.replace(&phrase, "");
    let phrase = phrase.trim();

    if let Some((_, category)) = LEXICON.iter().find(|(key, _)| *key == phrase) {
        return Some(*category);
    }

    LEXICON
        .iter()
        .filter(|(key, _)| phrase.contains(key))
        .max_by_key(|(key, _)| key.chars().count())
        .map(|(_, category)| *category)
}

fn parse_count(word: &str) -> Option<u32> {
    match word {
        "un" | "une" | "one" | "a" | "an" => Some(1),
        digits => digits.parse().ok(),
    }
}

fn normalize(text: &str) -> String {
    text.replace('\u{2019}', "'")
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
