//! Compiled regex patterns for title normalization and ReShade shader scanning.
//!
//! These patterns are compiled once on first use and reused throughout.

use once_cell::sync::Lazy;
use regex::Regex;

// ═══════════════════════════════════════════════════════════════════════════════
// Title Normalization Regexes
// ═══════════════════════════════════════════════════════════════════════════════

pub static RE_TRADEMARKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[™©®]").unwrap());
pub static RE_SQUARE_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());
pub static RE_ROUND_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(.*?\)").unwrap());
pub static RE_COLON_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*:\s*").unwrap());
pub static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
pub static RE_TRAILING_THE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),\s*The$").unwrap());

/// Edition noise at the end of a title, optionally preceded by a separator.
pub static RE_EDITION_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[\s:\-–—]*\b(?:game of the year edition|game of the year|goty edition|definitive edition|digital deluxe edition|deluxe edition|complete edition|ultimate edition|enhanced edition|special edition|standard edition|gold edition|goty)\s*$",
    )
    .unwrap()
});

// ═══════════════════════════════════════════════════════════════════════════════
// ReShade Regexes
// ═══════════════════════════════════════════════════════════════════════════════

/// First `technique <Name>` declaration in an `.fx` shader source.
pub static RE_RESHADE_TECHNIQUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"technique ([^\s]+)").unwrap());
