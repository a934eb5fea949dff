//! Match percentage extraction from free-form feedback

use regex::Regex;
use std::sync::LazyLock;

static LABELLED_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(overall\s+match(?:\s+percentage)?|match\s+percentage)\s*[:\-]?\s*(\d{1,3})\s*%")
        .expect("valid labelled score regex")
});

static ANY_PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,3})\s*%").expect("valid percent regex"));

/// Match percentage in `feedback`, clamped to `[0, 100]`.
///
/// A labelled figure ("Overall Match Percentage: 72%") wins; otherwise the
/// largest standalone `N%` is used; no figure at all scores 0.
pub fn extract_match_percentage(feedback: &str) -> u8 {
    let text = feedback.replace(['\n', '\r'], " ");

    let value = match LABELLED_SCORE.captures(&text) {
        Some(caps) => caps[2].parse::<u32>().unwrap_or(0),
        None => ANY_PERCENT
            .captures_iter(&text)
            .filter_map(|caps| caps[1].parse::<u32>().ok())
            .max()
            .unwrap_or(0),
    };

    value.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labelled_score() {
        assert_eq!(extract_match_percentage("Overall Match Percentage: 72%"), 72);
        assert_eq!(extract_match_percentage("overall match - 64 %"), 64);
        assert_eq!(extract_match_percentage("MATCH PERCENTAGE 55%"), 55);
    }

    #[test]
    fn test_label_beats_larger_numbers() {
        let feedback = "Reduced costs by 90% at Acme.\nOverall match:\n41%";
        assert_eq!(extract_match_percentage(feedback), 41);
    }

    #[test]
    fn test_falls_back_to_maximum() {
        assert_eq!(extract_match_percentage("Skills 80% aligned, tooling 15% aligned."), 80);
    }

    #[test]
    fn test_no_percentage_is_zero() {
        assert_eq!(extract_match_percentage("Strong candidate, no figure given."), 0);
        assert_eq!(extract_match_percentage("Error: remote service failed after 5 attempts"), 0);
    }

    #[test]
    fn test_values_are_clamped() {
        assert_eq!(extract_match_percentage("Overall match: 150%"), 100);
        assert_eq!(extract_match_percentage("exceeds by 150%"), 100);
    }
}
