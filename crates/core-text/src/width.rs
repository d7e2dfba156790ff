//! Display width of text in terminal columns, plus the `Measure` seam used
//! by the wrap engine.
//!
//! Widths are computed per extended grapheme cluster (EGC). The classifier
//! favors over-estimation for emoji style clusters: an extra blank column is
//! harmless inside a cell, an under-estimate pushes text over the border.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width measurement injected into [`crate::wrap`].
///
/// Implementations must be pure: the same input always yields the same
/// width. Any `Fn(&str) -> f32` closure is a `Measure`.
pub trait Measure {
    fn measure(&self, text: &str) -> f32;
}

impl<F> Measure for F
where
    F: Fn(&str) -> f32,
{
    fn measure(&self, text: &str) -> f32 {
        self(text)
    }
}

/// Terminal column width (grapheme aware).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayWidth;

impl Measure for DisplayWidth {
    fn measure(&self, text: &str) -> f32 {
        f32::from(display_width(text))
    }
}

/// One unit per `char`. Handy for tests and fixed-pitch surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharCount;

impl Measure for CharCount {
    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32
    }
}

const ZWJ: char = '\u{200D}';
const VS16: char = '\u{FE0F}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

// Rough Extended Pictographic ranges (emoji blocks + misc symbols/dingbats).
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

/// Column width of a single grapheme cluster.
///
/// Precondition: `egc` is one cluster as produced by
/// `UnicodeSegmentation::graphemes(true)`. Empty input is 0.
pub fn egc_width(egc: &str) -> u16 {
    if egc.is_empty() {
        return 0;
    }
    let base = UnicodeWidthStr::width(egc).min(2) as u16;
    let pictographic = egc
        .chars()
        .any(|c| is_extended_pictographic(c) || is_regional_indicator(c));
    let composed = egc.contains(ZWJ) || egc.contains(VS16);
    if pictographic && (composed || base < 2) {
        return 2;
    }
    // Control characters report 0; treat any non-empty cluster as visible.
    base.max(1)
}

/// Total display width of `text`, saturating at `u16::MAX`.
pub fn display_width(text: &str) -> u16 {
    text.graphemes(true)
        .fold(0u16, |acc, g| acc.saturating_add(egc_width(g)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii() {
        assert_eq!(egc_width("a"), 1);
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn wide_cjk() {
        assert_eq!(egc_width("界"), 2);
        assert_eq!(display_width("世界"), 4);
    }

    #[test]
    fn emoji_basic() {
        assert_eq!(egc_width("😀"), 2);
    }

    #[test]
    fn emoji_zwj_family_is_single_wide_cluster() {
        assert_eq!(display_width("👨‍👩‍👧"), 2);
    }

    #[test]
    fn flag_pair_is_wide() {
        assert_eq!(display_width("🇩🇰"), 2);
    }

    #[test]
    fn combining_mark_stays_narrow() {
        assert_eq!(display_width("e\u{0301}"), 1);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(egc_width(""), 0);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn closures_are_measures() {
        let m = |s: &str| s.len() as f32 * 10.0;
        assert_eq!(m.measure("abc"), 30.0);
        assert_eq!(CharCount.measure("æøå"), 3.0);
        assert_eq!(DisplayWidth.measure("ab界"), 4.0);
    }
}
