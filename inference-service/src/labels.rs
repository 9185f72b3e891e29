//! Mapping from raw predicted labels to response sentiment strings

use std::str::FromStr;

use thiserror::Error;

/// Response label for raw label `1`
pub const POSITIVE: &str = "positive";

/// Response label for raw label `0`
pub const NEGATIVE: &str = "negative";

/// Labels the binary policy can produce
pub const BINARY_LABELS: [&str; 2] = [POSITIVE, NEGATIVE];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LabelError {
    #[error("Model produced label {0}, which has no binary sentiment mapping")]
    Unmapped(i64),
}

/// How a raw predicted value becomes the `sentiment` field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LabelPolicy {
    /// `1 -> "positive"`, `0 -> "negative"`, anything else is an error
    #[default]
    Binary,
    /// The raw value as a decimal string
    Raw,
}

impl LabelPolicy {
    pub fn apply(self, raw: i64) -> Result<String, LabelError> {
        match self {
            Self::Binary => match raw {
                1 => Ok(POSITIVE.to_string()),
                0 => Ok(NEGATIVE.to_string()),
                other => Err(LabelError::Unmapped(other)),
            },
            Self::Raw => Ok(raw.to_string()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Raw => "raw",
        }
    }
}

impl FromStr for LabelPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "raw" => Ok(Self::Raw),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_mapping() {
        assert_eq!(LabelPolicy::Binary.apply(1).unwrap(), "positive");
        assert_eq!(LabelPolicy::Binary.apply(0).unwrap(), "negative");
        assert_eq!(LabelPolicy::Binary.apply(2), Err(LabelError::Unmapped(2)));
        assert_eq!(LabelPolicy::Binary.apply(-1), Err(LabelError::Unmapped(-1)));
    }

    #[test]
    fn test_raw_mapping() {
        assert_eq!(LabelPolicy::Raw.apply(1).unwrap(), "1");
        assert_eq!(LabelPolicy::Raw.apply(0).unwrap(), "0");
        assert_eq!(LabelPolicy::Raw.apply(-3).unwrap(), "-3");
    }

    #[test]
    fn test_parse() {
        assert_eq!("Binary".parse::<LabelPolicy>(), Ok(LabelPolicy::Binary));
        assert_eq!(" raw ".parse::<LabelPolicy>(), Ok(LabelPolicy::Raw));
        assert_eq!("fancy".parse::<LabelPolicy>(), Err(()));
    }
}
