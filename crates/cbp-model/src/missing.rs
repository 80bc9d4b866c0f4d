//! Missing-value tokens recognised in clinical input files.

/// Cell contents read as "no value".
///
/// Mirrors the NA tokens understood by common tabular tooling so that files
/// exported from spreadsheets or data frames round-trip the same way.
pub const MISSING_TOKENS: &[&str] = &[
    "",
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "<NA>",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "None",
    "n/a",
    "nan",
    "null",
];

/// Returns true if a raw cell should be stored as missing.
///
/// Matching is exact; surrounding whitespace is significant, so `" NA "` is
/// kept as text.
pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_na_tokens_are_missing() {
        assert!(is_missing_token(""));
        assert!(is_missing_token("NA"));
        assert!(is_missing_token("NaN"));
        assert!(is_missing_token("null"));
    }

    #[test]
    fn values_are_not_missing() {
        assert!(!is_missing_token("0"));
        assert!(!is_missing_token("Stable"));
        assert!(!is_missing_token(" NA "));
        assert!(!is_missing_token("na"));
    }
}
