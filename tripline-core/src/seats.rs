use serde::{Deserialize, Serialize};
use std::fmt;

/// A cabin seat label such as "12A": a row number followed by an optional
/// seat letter. The letter is optional on the read side because historical
/// data contains bare row labels; a bookable seat always carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatLabel {
    pub row: u32,
    pub letter: Option<char>,
}

impl SeatLabel {
    /// Parse a label of the shape digits + optional single capital letter.
    /// Returns None for anything else (empty string, trailing garbage, etc).
    pub fn parse(raw: &str) -> Option<SeatLabel> {
        let raw = raw.trim();
        let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        let rest = &raw[digits.len()..];
        let row: u32 = digits.parse().ok()?;
        if row == 0 {
            return None;
        }
        match rest.len() {
            0 => Some(SeatLabel { row, letter: None }),
            1 => {
                let c = rest.chars().next().unwrap();
                if c.is_ascii_uppercase() {
                    Some(SeatLabel { row, letter: Some(c) })
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.letter {
            Some(c) => write!(f, "{}{}", self.row, c),
            None => write!(f, "{}", self.row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_label() {
        let seat = SeatLabel::parse("12A").unwrap();
        assert_eq!(seat.row, 12);
        assert_eq!(seat.letter, Some('A'));
        assert_eq!(seat.to_string(), "12A");
    }

    #[test]
    fn test_parse_row_only() {
        let seat = SeatLabel::parse("7").unwrap();
        assert_eq!(seat.row, 7);
        assert_eq!(seat.letter, None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(SeatLabel::parse("").is_none());
        assert!(SeatLabel::parse("A12").is_none());
        assert!(SeatLabel::parse("12a").is_none());
        assert!(SeatLabel::parse("12AB").is_none());
        assert!(SeatLabel::parse("0A").is_none());
    }
}
