//! String similarity primitives shared by the convention machinery.
//!
//! Edit distance comes from `rapidfuzz`; the phonetic code (Soundex) and the
//! semantic-relationship tables are implemented here. All scores live in
//! `[0, 1]`.

use std::collections::BTreeSet;

use rapidfuzz::distance::levenshtein;

/// Floor applied to weak matches so related-but-distant names never score
/// zero outright.
pub const CONFIDENCE_FLOOR: f64 = 0.2;

/// Groups of words treated as semantically related. Cross-membership
/// between two names adds a bonus per group hit.
const SEMANTIC_GROUPS: &[&[&str]] = &[
    &["profile", "avatar", "picture", "image", "photo", "icon"],
    &["url", "uri", "link", "href"],
    &["email", "mail"],
    &["password", "pass", "pwd"],
    &["user", "username", "login", "account"],
    &["id", "identifier", "key", "code"],
];

const SEMANTIC_BONUS_PER_HIT: f64 = 0.1;

/// Levenshtein-based similarity: `1 − editDistance / maxLength`.
#[must_use]
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    levenshtein::normalized_similarity(a.chars(), b.chars())
}

/// Four-character Soundex code of the alphabetic content of `input`.
/// Empty when the input has no letters.
#[must_use]
pub fn soundex(input: &str) -> String {
    fn digit(c: char) -> u8 {
        match c {
            'B' | 'F' | 'P' | 'V' => 1,
            'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => 2,
            'D' | 'T' => 3,
            'L' => 4,
            'M' | 'N' => 5,
            'R' => 6,
            _ => 0,
        }
    }

    let letters: Vec<char> = input
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let Some(&first) = letters.first() else {
        return String::new();
    };

    let mut code = String::new();
    code.push(first);
    let mut prev = digit(first);
    for &c in &letters[1..] {
        let d = digit(c);
        if d != 0 && d != prev {
            code.push(char::from(b'0' + d));
            if code.len() == 4 {
                break;
            }
        }
        // H and W are transparent: they do not reset the previous digit.
        if !matches!(c, 'H' | 'W') {
            prev = d;
        }
    }
    while code.len() < 4 {
        code.push('0');
    }
    code
}

/// Whether two names share a non-empty Soundex code.
#[must_use]
pub fn phonetic_eq(a: &str, b: &str) -> bool {
    let code_a = soundex(a);
    !code_a.is_empty() && code_a == soundex(b)
}

fn word_set(canonical: &str) -> BTreeSet<&str> {
    canonical.split_whitespace().collect()
}

/// Semantic-relationship bonus between two canonical forms: +0.1 per group
/// with membership on both sides.
#[must_use]
pub fn semantic_bonus(a: &str, b: &str) -> f64 {
    let words_a = word_set(a);
    let words_b = word_set(b);
    let mut bonus = 0.0;
    for group in SEMANTIC_GROUPS {
        let hit_a = words_a.iter().any(|w| group.contains(w));
        let hit_b = words_b.iter().any(|w| group.contains(w));
        if hit_a && hit_b {
            bonus += SEMANTIC_BONUS_PER_HIT;
        }
    }
    bonus
}

/// Hardcoded minimum scores for well-known near-synonym pairs.
#[must_use]
pub fn semantic_override(a: &str, b: &str) -> Option<f64> {
    let words_a = word_set(a);
    let words_b = word_set(b);
    let profile_avatar = (words_a.contains("profile") && words_b.contains("avatar"))
        || (words_a.contains("avatar") && words_b.contains("profile"));
    let user_id = (a == "user id" && b == "id") || (a == "id" && b == "user id");
    if profile_avatar || user_id {
        Some(0.75)
    } else {
        None
    }
}

/// Levenshtein similarity plus the semantic bonus, capped at 1.0, with the
/// hardcoded overrides applied. Scores at or below `cutoff` are clamped up
/// to [`CONFIDENCE_FLOOR`].
#[must_use]
pub fn scored_similarity(a: &str, b: &str, cutoff: f64) -> f64 {
    let mut score = edit_similarity(a, b) + semantic_bonus(a, b);
    if score > 1.0 {
        score = 1.0;
    }
    if let Some(min) = semantic_override(a, b) {
        score = score.max(min);
    }
    if score > cutoff {
        score
    } else {
        score.max(CONFIDENCE_FLOOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_similarity_bounds() {
        assert_eq!(edit_similarity("abc", "abc"), 1.0);
        assert_eq!(edit_similarity("", ""), 1.0);
        assert_eq!(edit_similarity("abc", "xyz"), 0.0);
        let sim = edit_similarity("first name", "last name");
        assert!(sim > 0.0 && sim < 1.0);
    }

    #[test]
    fn soundex_classic_examples() {
        assert_eq!(soundex("Robert"), "R163");
        assert_eq!(soundex("Rupert"), "R163");
        assert_eq!(soundex("Ashcraft"), "A261");
        assert_eq!(soundex(""), "");
        assert_eq!(soundex("123"), "");
    }

    #[test]
    fn phonetic_eq_matches_homophones() {
        assert!(phonetic_eq("smith", "smyth"));
        assert!(!phonetic_eq("smith", "jones"));
        assert!(!phonetic_eq("", ""));
    }

    #[test]
    fn semantic_bonus_counts_group_hits() {
        assert_eq!(semantic_bonus("email address", "mail box"), 0.1);
        assert_eq!(semantic_bonus("user id", "login key"), 0.2);
        assert_eq!(semantic_bonus("first name", "last name"), 0.0);
    }

    #[test]
    fn overrides_force_known_pairs() {
        assert_eq!(semantic_override("profile", "avatar"), Some(0.75));
        assert_eq!(semantic_override("avatar url", "profile picture"), Some(0.75));
        assert_eq!(semantic_override("user id", "id"), Some(0.75));
        assert_eq!(semantic_override("name", "title"), None);
    }

    #[test]
    fn scored_similarity_floors_unrelated_words() {
        assert_eq!(scored_similarity("xyz", "qrs", 0.7), CONFIDENCE_FLOOR);
        assert_eq!(scored_similarity("abc", "abc", 0.7), 1.0);
    }
}
