//! Conversion of ISO-8601 duration tokens into seconds
//!
//! The video API reports lengths as `PT#H#M#S` (with a leading `P#D` day part
//! for very long streams). Anything that does not parse yields 0, which the
//! crawler treats as "unknown length".

use regex::Regex;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("duration pattern is valid")
});

/// Parses a duration token such as `PT1H2M10S` into total seconds
///
/// Returns 0 for an empty, malformed or absent token, and for a token whose
/// total does not fit in a `u64`.
pub fn parse_duration(token: &str) -> u64 {
    let Some(caps) = DURATION_RE.captures(token.trim()) else {
        return 0;
    };

    let part = |index: usize| -> u64 {
        caps.get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    let total = part(1)
        .checked_mul(86_400)
        .and_then(|secs| secs.checked_add(part(2).checked_mul(3_600)?))
        .and_then(|secs| secs.checked_add(part(3).checked_mul(60)?))
        .and_then(|secs| secs.checked_add(part(4)));

    total.unwrap_or(0)
}

/// Whether a duration counts as short-form content (inclusive threshold)
pub fn is_short_form(duration_secs: u64, threshold_secs: u64) -> bool {
    duration_secs <= threshold_secs
}
