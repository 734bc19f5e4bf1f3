//! Title canonicalization.
//!
//! Two strengths are used by the matcher:
//!
//! - [`normalize_game_name`] cleans a display title (trademarks, bracketed tags,
//!   separators, edition noise) and is applied to the query and every candidate.
//! - [`match_key`] is the loose form compared by the exact tier: lowercase with
//!   every non letter/digit removed.
//!
//! [`fold_case`] is the lowercase-only transform applied before scoring.

use regex::Regex;

use crate::patterns::{
    RE_COLON_SPACING, RE_EDITION_SUFFIX, RE_ROUND_GROUP, RE_SQUARE_GROUP, RE_TRADEMARKS,
    RE_TRAILING_THE, RE_WHITESPACE,
};

pub fn normalize_game_name(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let mut name = RE_TRADEMARKS.replace_all(raw, "").into_owned();
    name = name
        .replace(|c: char| c == '_' || c == '.', " ")
        .replace('’', "'");
    name = remove_unless_emptied(&name, &RE_SQUARE_GROUP);
    name = remove_unless_emptied(&name, &RE_ROUND_GROUP);
    name = RE_COLON_SPACING.replace_all(&name, ": ").into_owned();
    name = RE_WHITESPACE.replace_all(&name, " ").into_owned();

    if RE_TRAILING_THE.is_match(&name) {
        name = format!("The {}", RE_TRAILING_THE.replace(&name, ""));
    }

    name = remove_unless_emptied(name.trim(), &RE_EDITION_SUFFIX);
    name.trim().to_string()
}

pub fn match_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

fn remove_unless_emptied(input: &str, pattern: &Regex) -> String {
    let removed = pattern.replace_all(input, "");
    if removed.trim().is_empty() {
        input.to_string()
    } else {
        removed.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trademarks_and_tags() {
        assert_eq!(
            normalize_game_name("The Witcher® 3: Wild Hunt™"),
            "The Witcher 3: Wild Hunt"
        );
        assert_eq!(normalize_game_name("DOOM (2016)"), "DOOM");
        assert_eq!(normalize_game_name("Half-Life 2 [Beta]"), "Half-Life 2");
    }

    #[test]
    fn test_keeps_group_when_it_is_the_whole_title() {
        assert_eq!(normalize_game_name("(2016)"), "(2016)");
        assert_eq!(normalize_game_name("[Untitled]"), "[Untitled]");
    }

    #[test]
    fn test_separators_and_spacing() {
        assert_eq!(normalize_game_name("Ori_and_the_Blind_Forest"), "Ori and the Blind Forest");
        assert_eq!(normalize_game_name("Star Wars :  Squadrons"), "Star Wars: Squadrons");
        assert_eq!(normalize_game_name("Assassin’s Creed"), "Assassin's Creed");
    }

    #[test]
    fn test_trailing_article_moves_to_front() {
        assert_eq!(normalize_game_name("Witcher 3, The"), "The Witcher 3");
    }

    #[test]
    fn test_edition_noise_removed() {
        assert_eq!(normalize_game_name("Fallout 4 Game of the Year Edition"), "Fallout 4");
        assert_eq!(normalize_game_name("Fallout 4: GOTY"), "Fallout 4");
        assert_eq!(normalize_game_name("Divinity: Original Sin 2 - Definitive Edition"), "Divinity: Original Sin 2");
        assert_eq!(normalize_game_name("GOTY"), "GOTY");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_game_name(""), "");
        assert_eq!(normalize_game_name("   "), "");
    }

    #[test]
    fn test_symbol_and_case_variants_share_a_key() {
        let variants = [
            "The Witcher 3: Wild Hunt",
            "the witcher 3 wild hunt",
            "THE WITCHER® 3 - WILD HUNT",
            "The.Witcher.3.Wild.Hunt",
            "Witcher 3: Wild Hunt, The",
        ];
        let keys: Vec<String> = variants
            .iter()
            .map(|v| match_key(&normalize_game_name(v)))
            .collect();
        assert!(keys.iter().all(|k| k == "thewitcher3wildhunt"), "{:?}", keys);
    }

    #[test]
    fn test_match_key_keeps_non_ascii_letters() {
        assert_eq!(match_key("Ōkami HD"), "ōkamihd");
    }

    #[test]
    fn test_fold_case_only_lowercases() {
        assert_eq!(fold_case("Half-Life 2: Episode One"), "half-life 2: episode one");
    }
}
