//! `meta_study.txt` parsing.
//!
//! The study metadata file is a list of `key: value` lines. Only
//! `cancer_study_identifier` is needed to stamp the export; the other keys are
//! kept for logging and the run summary.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{IngestError, Result};

/// Key of the line that names the study.
pub const STUDY_IDENTIFIER_KEY: &str = "cancer_study_identifier";

const SEPARATOR: &str = ": ";

/// All `key: value` pairs of a study metadata file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyMetadata {
    pub entries: Vec<(String, String)>,
}

impl StudyMetadata {
    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn study_identifier(&self) -> Option<&str> {
        self.get(STUDY_IDENTIFIER_KEY).filter(|v| !v.is_empty())
    }

    /// Display name of the study (`name:` line).
    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn type_of_cancer(&self) -> Option<&str> {
        self.get("type_of_cancer")
    }
}

/// Value of a single line if it is the study identifier line.
///
/// `None` means "not the identifier line". `Some(None)` means it is the
/// identifier line but carries no usable value.
fn identifier_from_line(line: &str) -> Option<Option<String>> {
    let trimmed = line.trim();
    if !trimmed.starts_with(STUDY_IDENTIFIER_KEY) {
        return None;
    }
    let value = trimmed
        .split_once(SEPARATOR)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    Some(value)
}

/// Extracts the study identifier from metadata text.
///
/// Only the first line starting with `cancer_study_identifier` is considered;
/// if it has no `": "` separator or an empty value the result is `None`.
pub fn parse_study_identifier(text: &str) -> Option<String> {
    text.lines().find_map(identifier_from_line).flatten()
}

/// Reads the study identifier from a metadata file, stopping at the first match.
pub fn read_study_identifier(path: &Path) -> Result<Option<String>> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| IngestError::io(path, e))?;
        if let Some(value) = identifier_from_line(&line) {
            return Ok(value);
        }
    }
    Ok(None)
}

/// Like [`read_study_identifier`], but a missing identifier is an error.
pub fn require_study_identifier(path: &Path) -> Result<String> {
    read_study_identifier(path)?.ok_or_else(|| IngestError::MissingStudyIdentifier {
        path: path.to_path_buf(),
    })
}

/// Reads every `key: value` line of a study metadata file.
///
/// Lines without a `:` are ignored. Keys and values are trimmed.
pub fn read_study_metadata(path: &Path) -> Result<StudyMetadata> {
    let file = File::open(path).map_err(|e| IngestError::io(path, e))?;
    let mut metadata = StudyMetadata::default();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| IngestError::io(path, e))?;
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        metadata
            .entries
            .push((key.to_string(), value.trim().to_string()));
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_meta(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_parse_identifier() {
        let text = "type_of_cancer: brca\ncancer_study_identifier: BRCA_pps\nname: Breast\n";
        assert_eq!(parse_study_identifier(text), Some("BRCA_pps".to_string()));
    }

    #[test]
    fn test_parse_identifier_trims_value_and_line() {
        let text = "   cancer_study_identifier:   BRCA_pps  \r\n";
        assert_eq!(parse_study_identifier(text), Some("BRCA_pps".to_string()));
    }

    #[test]
    fn test_value_keeps_later_separators() {
        let text = "cancer_study_identifier: a: b\n";
        assert_eq!(parse_study_identifier(text), Some("a: b".to_string()));
    }

    #[test]
    fn test_first_matching_line_wins() {
        let text = "cancer_study_identifier: first\ncancer_study_identifier: second\n";
        assert_eq!(parse_study_identifier(text), Some("first".to_string()));
    }

    #[test]
    fn test_missing_line() {
        assert_eq!(parse_study_identifier("name: Breast\n"), None);
        assert_eq!(parse_study_identifier(""), None);
    }

    #[test]
    fn test_matching_line_without_separator_is_absent() {
        let text = "cancer_study_identifier=BRCA\ncancer_study_identifier: later\n";
        assert_eq!(parse_study_identifier(text), None);
        assert_eq!(parse_study_identifier("cancer_study_identifier: \n"), None);
    }

    #[test]
    fn test_read_matches_parse() {
        let file = create_temp_meta("type_of_cancer: brca\ncancer_study_identifier: BRCA_pps\n");
        assert_eq!(
            read_study_identifier(file.path()).unwrap(),
            Some("BRCA_pps".to_string())
        );
        assert_eq!(require_study_identifier(file.path()).unwrap(), "BRCA_pps");
    }

    #[test]
    fn test_require_fails_without_identifier() {
        let file = create_temp_meta("type_of_cancer: brca\n");
        let result = require_study_identifier(file.path());
        assert!(matches!(
            result,
            Err(IngestError::MissingStudyIdentifier { .. })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_study_identifier(Path::new("/nonexistent/meta_study.txt"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_read_study_metadata() {
        let file = create_temp_meta(
            "type_of_cancer: brca\ncancer_study_identifier: BRCA_pps\nname: Breast PPS\n\nadd_global_case_list: true\n",
        );
        let metadata = read_study_metadata(file.path()).unwrap();

        assert_eq!(metadata.entries.len(), 4);
        assert_eq!(metadata.study_identifier(), Some("BRCA_pps"));
        assert_eq!(metadata.name(), Some("Breast PPS"));
        assert_eq!(metadata.type_of_cancer(), Some("brca"));
        assert_eq!(metadata.get("add_global_case_list"), Some("true"));
    }
}
