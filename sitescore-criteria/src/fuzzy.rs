//! Token-set fuzzy matching for school names.
//!
//! [`token_set_ratio`] compares the word sets of two strings, so word order
//! and repeated words do not matter and a name that is a subset of the other
//! matches perfectly. Scores are integers in `0..=100`; a match is accepted
//! only when it scores strictly above [`MATCH_THRESHOLD`].

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;
use rapidfuzz::fuzz;

/// Scores at or below this value are treated as no match.
pub const MATCH_THRESHOLD: u8 = 80;

/// The best-scoring choice returned by [`extract_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Position of the choice in the input.
    pub index: usize,
    /// Similarity score in `0..=100`.
    pub score: u8,
}

impl FuzzyMatch {
    /// Report whether the score clears [`MATCH_THRESHOLD`].
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        self.score > MATCH_THRESHOLD
    }
}

fn preprocess(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_owned()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn joined(tokens: &BTreeSet<&str>) -> String {
    tokens.iter().copied().collect::<Vec<_>>().join(" ")
}

fn unrounded_token_set_ratio(left: &str, right: &str) -> f64 {
    let left_tokens: BTreeSet<&str> = left.split_whitespace().collect();
    let right_tokens: BTreeSet<&str> = right.split_whitespace().collect();
    if left_tokens.is_empty() || right_tokens.is_empty() {
        return 0.0;
    }

    let intersection: BTreeSet<&str> = left_tokens.intersection(&right_tokens).copied().collect();
    let left_only: BTreeSet<&str> = left_tokens.difference(&right_tokens).copied().collect();
    let right_only: BTreeSet<&str> = right_tokens.difference(&left_tokens).copied().collect();
    if !intersection.is_empty() && (left_only.is_empty() || right_only.is_empty()) {
        return 100.0;
    }

    let sect = joined(&intersection);
    let left_diff = joined(&left_only);
    let right_diff = joined(&right_only);
    let differences = diff_ratio(&sect, &left_diff, &right_diff);
    if sect.is_empty() {
        return differences;
    }
    let sect_left = format!("{sect} {left_diff}");
    let sect_right = format!("{sect} {right_diff}");
    differences
        .max(percent_ratio(&sect, &sect_left))
        .max(percent_ratio(&sect, &sect_right))
}

#[expect(clippy::float_arithmetic, reason = "scales a unit ratio to percent")]
fn percent_ratio(left: &str, right: &str) -> f64 {
    100.0 * fuzz::ratio(left.chars(), right.chars())
}

/// Indel similarity of the two differences, normalised by the lengths of
/// the intersection joined with each difference.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "similarity is a percentage of small string lengths"
)]
fn diff_ratio(sect: &str, left_diff: &str, right_diff: &str) -> f64 {
    let sect_len = char_len(sect);
    let separator = usize::from(sect_len != 0);
    let total = 2 * (sect_len + separator) + char_len(left_diff) + char_len(right_diff);
    if total == 0 {
        return 100.0;
    }
    let distance = indel::distance(left_diff.chars(), right_diff.chars());
    100.0 - 100.0 * distance as f64 / total as f64
}

/// Token-set similarity of two strings, rounded half-to-even.
///
/// Both inputs are reduced to lowercase ASCII words first. An empty side
/// scores zero.
///
/// # Examples
/// ```
/// use sitescore_criteria::fuzzy::token_set_ratio;
///
/// assert_eq!(token_set_ratio("martin luther king", "king martin luther"), 100);
/// assert_eq!(token_set_ratio("abcdefghij", "abcdefghxy"), 80);
/// assert_eq!(token_set_ratio("oak grove", ""), 0);
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the ratio is rounded within 0..=100 before narrowing"
)]
pub fn token_set_ratio(left: &str, right: &str) -> u8 {
    let ratio = unrounded_token_set_ratio(&preprocess(left), &preprocess(right));
    ratio.round_ties_even().clamp(0.0, 100.0) as u8
}

/// The first choice with the highest [`token_set_ratio`] against `query`.
///
/// Returns `None` when there are no choices. The match is returned even when
/// it scores below the threshold; see [`FuzzyMatch::is_accepted`].
pub fn extract_one<'a, I>(query: &str, choices: I) -> Option<FuzzyMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<FuzzyMatch> = None;
    for (index, choice) in choices.into_iter().enumerate() {
        let score = token_set_ratio(query, choice);
        if best.is_none_or(|current| score > current.score) {
            best = Some(FuzzyMatch { index, score });
        }
    }
    best
}
