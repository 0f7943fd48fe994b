//! Emphasis-marker arithmetic.
//!
//! `**span**` renders as bold. Marker characters never count toward length
//! limits; one matched pair counts as one bold unit.

pub const MARKER: &str = "**";

/// Removes every `**` marker. Idempotent: a run of `k` asterisks reduces to
/// `k % 2`, so a second pass finds nothing left to remove.
pub fn strip_markers(text: &str) -> String {
    text.replace(MARKER, "")
}

/// Number of `**` occurrences (non-overlapping, left to right).
pub fn count_markers(text: &str) -> usize {
    text.matches(MARKER).count()
}

/// One bold unit per matched pair of markers.
pub fn count_bold_units(text: &str) -> usize {
    count_markers(text) / 2
}

/// Length and bold-unit count of an emphasis-marked string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Unicode scalar values after marker removal.
    pub chars: usize,
    pub bold_units: usize,
}

pub fn measure(text: &str) -> Measurement {
    Measurement {
        chars: strip_markers(text).chars().count(),
        bold_units: count_bold_units(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_markers() {
        assert_eq!(strip_markers("Built **fast** APIs"), "Built fast APIs");
    }

    #[test]
    fn test_strip_is_idempotent() {
        for text in [
            "plain",
            "**a** and **b**",
            "odd *** run",
            "****",
            "x*****y",
            "*a**b*",
            "",
        ] {
            let once = strip_markers(text);
            assert_eq!(strip_markers(&once), once, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn test_bold_units_are_half_of_marker_occurrences() {
        assert_eq!(count_bold_units("**a** **b** **c**"), 3);
        // Unpaired trailing marker does not make a unit.
        assert_eq!(count_markers("**a** **b"), 3);
        assert_eq!(count_bold_units("**a** **b"), 1);
        assert_eq!(count_bold_units("no emphasis"), 0);
    }

    #[test]
    fn test_measure_excludes_markers_from_length() {
        let m = measure("**3.89 GPA** at **NEU**");
        assert_eq!(m.chars, "3.89 GPA at NEU".len());
        assert_eq!(m.bold_units, 2);
    }

    #[test]
    fn test_measure_counts_unicode_scalars() {
        let m = measure("**café** naïve");
        assert_eq!(m.chars, "café naïve".chars().count());
        assert_eq!(m.bold_units, 1);
    }
}
