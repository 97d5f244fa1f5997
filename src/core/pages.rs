use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// 1-based page list parsed from `1-3,5` style input.
///
/// Ranges stay unexpanded until the document's page count is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    ranges: Vec<RangeInclusive<usize>>,
}

impl PageSelection {
    /// Zero-based page indices within `page_count`, ascending and deduplicated.
    pub fn indices(&self, page_count: usize) -> Vec<usize> {
        let mut pages = BTreeSet::new();
        for range in &self.ranges {
            let end = (*range.end()).min(page_count);
            pages.extend(*range.start()..=end);
        }
        pages.into_iter().map(|page| page - 1).collect()
    }
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut ranges = Vec::new();
        for token in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Some((start, end)) = token.split_once('-') {
                let start: usize = start
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range start: '{start}'"))?;
                let end: usize = end
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid page range end: '{end}'"))?;
                if start == 0 || end == 0 {
                    return Err("pages are 1-based".to_string());
                }
                if end < start {
                    return Err(format!("invalid range '{token}': end is smaller than start"));
                }
                ranges.push(start..=end);
            } else {
                let page: usize = token
                    .parse()
                    .map_err(|_| format!("invalid page number: '{token}'"))?;
                if page == 0 {
                    return Err("pages are 1-based".to_string());
                }
                ranges.push(page..=page);
            }
        }

        if ranges.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        Ok(Self { ranges })
    }
}

#[cfg(test)]
mod tests {
    use super::PageSelection;
    use std::str::FromStr;

    #[test]
    fn parses_ranges_and_singles() {
        let selection = PageSelection::from_str("1-3,5").expect("selection should parse");
        assert_eq!(selection.indices(4), vec![0, 1, 2]);
        assert_eq!(selection.indices(10), vec![0, 1, 2, 4]);
    }

    #[test]
    fn overlapping_ranges_are_deduplicated() {
        let selection = PageSelection::from_str("2-4,3,4-5").expect("selection should parse");
        assert_eq!(selection.indices(10), vec![1, 2, 3, 4]);
    }

    #[test]
    fn huge_range_is_clamped_to_page_count() {
        let selection =
            PageSelection::from_str(&format!("2-{}", usize::MAX)).expect("selection should parse");
        assert_eq!(selection.indices(3), vec![1, 2]);
        assert!(selection.indices(0).is_empty());
    }

    #[test]
    fn rejects_reversed_range() {
        let err = PageSelection::from_str("3-1").expect_err("reversed range should fail");
        assert!(err.contains("invalid range"));
    }

    #[test]
    fn rejects_zero_page() {
        assert!(PageSelection::from_str("0").is_err());
    }
}
