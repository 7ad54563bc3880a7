use std::sync::LazyLock;

use regex::Regex;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"[-+]?(?:[0-9]*\.[0-9]+|[0-9]+)").expect("Number pattern must compile.")
});

/// Reads a relevance score out of free-form model output.
///
/// The first signed integer or decimal in `text` wins. Nothing is clamped, so `-1` stays `-1.0`
/// and `7` stays `7.0`. Text without a number scores `0.0`.
pub fn parse_score(text: &str) -> f64 {
	NUMBER.find(text).and_then(|m| m.as_str().parse::<f64>().ok()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_plain_and_embedded_numbers() {
		assert_eq!(parse_score("0.95"), 0.95);
		assert_eq!(parse_score("0.8 (high)"), 0.8);
		assert_eq!(parse_score("Score: 0.3."), 0.3);
		assert_eq!(parse_score("Relevance: .75"), 0.75);
	}

	#[test]
	fn missing_number_scores_zero() {
		assert_eq!(parse_score("no score"), 0.0);
		assert_eq!(parse_score("I cannot determine"), 0.0);
		assert_eq!(parse_score(""), 0.0);
	}

	#[test]
	fn negative_and_out_of_range_values_are_kept() {
		assert_eq!(parse_score("-1"), -1.0);
		assert_eq!(parse_score("-2.5 is low"), -2.5);
		assert_eq!(parse_score("10/10"), 10.0);
	}

	#[test]
	fn first_number_wins() {
		assert_eq!(parse_score("0.2, maybe 0.9"), 0.2);
		assert_eq!(parse_score("Between 0 and 1: 0.6"), 0.0);
	}
}
