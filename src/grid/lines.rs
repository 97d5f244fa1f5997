use serde::Serialize;

use crate::grid::mask::SeparatorMask;
use crate::grid::preprocess::WHITE;

/// Leading edges of every run of non-white values in a collapsed mask profile.
///
/// The width of each run is discarded; consecutive starts are always separated
/// by at least one white entry, so the result is strictly increasing.
pub fn line_starts(profile: &[u8]) -> Vec<u32> {
    let mut starts = Vec::new();
    let mut open = true;
    for (idx, &value) in (0u32..).zip(profile) {
        if value == WHITE {
            open = true;
        } else if open {
            open = false;
            starts.push(idx);
        }
    }
    starts
}

/// Ordered separator positions. `N` lines bound `N - 1` bands on each axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridLines {
    row_starts: Vec<u32>,
    col_starts: Vec<u32>,
}

impl GridLines {
    pub fn from_masks(horizontal: &SeparatorMask, vertical: &SeparatorMask) -> Self {
        Self {
            row_starts: line_starts(&horizontal.row_profile()),
            col_starts: line_starts(&vertical.col_profile()),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_starts(row_starts: Vec<u32>, col_starts: Vec<u32>) -> Self {
        debug_assert!(row_starts.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(col_starts.windows(2).all(|w| w[0] < w[1]));
        Self {
            row_starts,
            col_starts,
        }
    }

    pub fn row_starts(&self) -> &[u32] {
        &self.row_starts
    }

    pub fn col_starts(&self) -> &[u32] {
        &self.col_starts
    }

    pub fn row_bands(&self) -> usize {
        self.row_starts.len().saturating_sub(1)
    }

    pub fn col_bands(&self) -> usize {
        self.col_starts.len().saturating_sub(1)
    }

    /// Fewer than two lines on either axis leaves no band to build a grid from.
    pub fn is_degenerate(&self) -> bool {
        self.row_bands() == 0 || self.col_bands() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_only_leading_edges() {
        let profile = [255, 0, 0, 255, 128, 255, 255, 3, 3, 3];
        assert_eq!(line_starts(&profile), vec![1, 4, 7]);
    }

    #[test]
    fn all_white_profile_has_no_lines() {
        assert!(line_starts(&[255; 16]).is_empty());
    }

    #[test]
    fn leading_separator_starts_at_zero() {
        assert_eq!(line_starts(&[0, 255, 0]), vec![0, 2]);
    }

    #[test]
    fn positions_follow_profile_indices() {
        let mut profile = vec![255u8; 1_000];
        profile[0] = 0;
        profile[499] = 10;
        profile[500] = 10;
        profile[999] = 0;
        assert_eq!(line_starts(&profile), vec![0, 499, 999]);
    }

    #[test]
    fn counts_bands() {
        let lines = GridLines::from_starts(vec![10, 30], vec![10]);
        assert_eq!(lines.row_bands(), 1);
        assert_eq!(lines.col_bands(), 0);
        assert!(lines.is_degenerate());
    }
}
