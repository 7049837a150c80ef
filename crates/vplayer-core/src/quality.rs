//! Quality variant selection
//!
//! Variants are a static list; selection is a lookup, not bitrate
//! adaptation. Names double as sort keys through their leading number
//! ("1080p" → 1080). Names without one count as 0 and therefore rank lowest.

use crate::config::{DefaultQuality, QualityVariant};

/// Resolution token matched by [`DefaultQuality::P720`]
const P720_TOKEN: &str = "720p";

/// Integer prefix of a variant name.
///
/// Accepts leading whitespace, an optional sign and decimal digits; anything
/// else yields 0. Overlong digit runs saturate instead of wrapping.
pub fn leading_number(name: &str) -> i64 {
    let trimmed = name.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}

/// Index of the lowest variant; ties go to the earlier entry
pub fn lowest_index(qualities: &[QualityVariant]) -> Option<usize> {
    qualities
        .iter()
        .enumerate()
        .min_by_key(|(_, q)| leading_number(&q.name))
        .map(|(index, _)| index)
}

/// Index of the variant a selector resolves to
pub fn select_index(qualities: &[QualityVariant], selector: DefaultQuality) -> Option<usize> {
    match selector {
        DefaultQuality::Highest => (!qualities.is_empty()).then_some(0),
        DefaultQuality::P720 => qualities
            .iter()
            .position(|q| q.name.contains(P720_TOKEN))
            .or_else(|| lowest_index(qualities)),
        DefaultQuality::Lowest => lowest_index(qualities),
    }
}

/// Variant a selector resolves to
pub fn get_quality(qualities: &[QualityVariant], selector: DefaultQuality) -> Option<&QualityVariant> {
    select_index(qualities, selector).map(|index| &qualities[index])
}

/// Variant with the lowest leading number
pub fn get_lowest_quality(qualities: &[QualityVariant]) -> Option<&QualityVariant> {
    lowest_index(qualities).map(|index| &qualities[index])
}
