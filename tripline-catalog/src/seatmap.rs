use serde::Serialize;
use tripline_core::seats::SeatLabel;

pub const SEATS_PER_ROW: u32 = 6;
pub const ROW_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Cabin seat map: rows of six, last row possibly partial.
/// rows = ceil(total_seats / 6), labels `{row}{A..F}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeatMap {
    pub total_seats: i32,
    pub rows: u32,
}

impl SeatMap {
    pub fn new(total_seats: i32) -> Self {
        let total = total_seats.max(0) as u32;
        SeatMap {
            total_seats: total as i32,
            rows: total.div_ceil(SEATS_PER_ROW),
        }
    }

    /// Whether a label names a physical seat on this aircraft. Row-only
    /// labels are never bookable.
    pub fn contains(&self, label: &SeatLabel) -> bool {
        let Some(letter) = label.letter else {
            return false;
        };
        let Some(pos) = ROW_LETTERS.iter().position(|&c| c == letter) else {
            return false;
        };
        if label.row < 1 || label.row > self.rows {
            return false;
        }
        let index = (label.row - 1) * SEATS_PER_ROW + pos as u32;
        index < self.total_seats as u32
    }

    /// All labels in cabin order.
    pub fn labels(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.total_seats as usize);
        'rows: for row in 1..=self.rows {
            for (i, letter) in ROW_LETTERS.iter().enumerate() {
                let index = (row - 1) * SEATS_PER_ROW + i as u32;
                if index >= self.total_seats as u32 {
                    break 'rows;
                }
                out.push(format!("{}{}", row, letter));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_count() {
        assert_eq!(SeatMap::new(30).rows, 5);
        assert_eq!(SeatMap::new(31).rows, 6);
        assert_eq!(SeatMap::new(6).rows, 1);
        assert_eq!(SeatMap::new(0).rows, 0);
    }

    #[test]
    fn test_contains_respects_partial_last_row() {
        let map = SeatMap::new(31);
        assert!(map.contains(&SeatLabel::parse("6A").unwrap()));
        assert!(!map.contains(&SeatLabel::parse("6B").unwrap()));
        assert!(map.contains(&SeatLabel::parse("5F").unwrap()));
        assert!(!map.contains(&SeatLabel::parse("7A").unwrap()));
    }

    #[test]
    fn test_row_only_label_not_bookable() {
        let map = SeatMap::new(30);
        assert!(!map.contains(&SeatLabel::parse("3").unwrap()));
    }

    #[test]
    fn test_labels_enumeration() {
        let map = SeatMap::new(8);
        assert_eq!(
            map.labels(),
            vec!["1A", "1B", "1C", "1D", "1E", "1F", "2A", "2B"]
        );
    }
}
