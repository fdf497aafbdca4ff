//! Media kind enums for the AIMS catalog.

use serde::{Deserialize, Serialize};

/// The four physical media kinds AIMS sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Book,
    Cd,
    Lp,
    Dvd,
}

impl MediaType {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::Cd => "CD",
            Self::Lp => "LP",
            Self::Dvd => "DVD",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Book cover type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverType {
    Paperback,
    Hardcover,
}

/// DVD disc type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscType {
    Bluray,
    Hddvd,
    Dvd,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_wire_format() {
        assert_eq!(serde_json::to_string(&MediaType::Book).unwrap(), "\"BOOK\"");
        assert_eq!(serde_json::to_string(&MediaType::Lp).unwrap(), "\"LP\"");
        let parsed: MediaType = serde_json::from_str("\"DVD\"").unwrap();
        assert_eq!(parsed, MediaType::Dvd);
    }

    #[test]
    fn test_disc_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&DiscType::Bluray).unwrap(),
            "\"BLURAY\""
        );
    }
}
