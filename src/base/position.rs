/// Source position tracking for tree elements
///
/// Stores the line/column range an element was parsed from. Lines and columns
/// are 1-based, as produced by the native parser; a region whose start line is
/// 0 carries no position at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRegion {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceRegion {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// True when the region does not point anywhere.
    pub fn is_empty(&self) -> bool {
        self.start_line == 0
    }

    /// Check if a line/column falls within this region
    pub fn contains(&self, line: u32, col: u32) -> bool {
        if self.is_empty() || line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && col < self.start_col {
            return false;
        }
        if line == self.end_line && col > self.end_col {
            return false;
        }
        true
    }
}

/// Extract the line number from a location string in the `file:line` format.
///
/// Returns 1 when there is no `:` or the text after the last one is not a number.
pub fn line_from_location(location: &str) -> u32 {
    location
        .rsplit_once(':')
        .and_then(|(_, line)| line.trim().parse().ok())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_from_location() {
        assert_eq!(line_from_location("net.ned:42"), 42);
        assert_eq!(line_from_location("C:/work/net.ned:7"), 7);
    }

    #[test]
    fn test_line_from_location_defaults_to_one() {
        assert_eq!(line_from_location(""), 1);
        assert_eq!(line_from_location("net.ned"), 1);
        assert_eq!(line_from_location("net.ned:abc"), 1);
    }

    #[test]
    fn test_region_contains() {
        let region = SourceRegion::new(3, 5, 6, 2);
        assert!(region.contains(3, 5));
        assert!(region.contains(4, 100));
        assert!(!region.contains(3, 4));
        assert!(!region.contains(6, 3));
        assert!(!SourceRegion::default().contains(0, 0));
    }
}
