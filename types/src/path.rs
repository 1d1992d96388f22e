//! Group path slug.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid group path: {0:?}")]
pub struct InvalidGroupPath(pub String);

/// The URL slug that uniquely names a group.
///
/// 2 to 20 characters, each one of: lowercase ASCII letter, ASCII digit,
/// `_`, `-`, Hangul compatibility jamo (`ㄱ`..`ㅎ`) or a Hangul syllable
/// (`가`..`힣`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupPath(String);

impl GroupPath {
    pub const MIN_LEN: usize = 2;
    pub const MAX_LEN: usize = 20;

    /// Parse a raw slug, returning `None` if it is not a valid path.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let s = raw.into();
        Self::is_valid(&s).then_some(Self(s))
    }

    /// Whether `raw` is a well-formed path.
    pub fn is_valid(raw: &str) -> bool {
        let len = raw.chars().count();
        (Self::MIN_LEN..=Self::MAX_LEN).contains(&len) && raw.chars().all(is_path_char)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_path_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | 'ㄱ'..='ㅎ' | '가'..='힣')
}

impl TryFrom<String> for GroupPath {
    type Error = InvalidGroupPath;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidGroupPath(raw))
        }
    }
}

impl From<GroupPath> for String {
    fn from(path: GroupPath) -> Self {
        path.0
    }
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for GroupPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_digits_and_separators() {
        assert!(GroupPath::is_valid("rust-study_01"));
        assert!(GroupPath::is_valid("스터디"));
        assert!(GroupPath::is_valid("ㄱㄴ"));
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(!GroupPath::is_valid("a"));
        assert!(!GroupPath::is_valid(""));
        assert!(!GroupPath::is_valid(&"a".repeat(21)));
        assert!(GroupPath::is_valid(&"a".repeat(20)));
    }

    #[test]
    fn rejects_uppercase_spaces_and_slashes() {
        assert!(GroupPath::parse("Rust").is_none());
        assert!(GroupPath::parse("rust study").is_none());
        assert!(GroupPath::parse("rust/study").is_none());
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct Row {
        path: GroupPath,
    }

    #[test]
    fn deserializing_validates() {
        let row: Row = toml::from_str(r#"path = "rust-study""#).unwrap();
        assert_eq!(row.path.as_str(), "rust-study");
        assert_eq!(toml::to_string(&row).unwrap().trim(), r#"path = "rust-study""#);

        assert!(toml::from_str::<Row>(r#"path = "Rust Study""#).is_err());
        assert!(toml::from_str::<Row>(r#"path = "x""#).is_err());
        assert_eq!(
            GroupPath::try_from("../etc".to_string()),
            Err(InvalidGroupPath("../etc".into()))
        );
    }

    #[test]
    fn hangul_counts_characters_not_bytes() {
        // 10 syllables is 30 bytes of UTF-8.
        assert!(GroupPath::is_valid(&"가".repeat(10)));
    }
}
