use super::{detect_level, format_heading, Heading};
use crate::error::Error;

#[test]
fn test_levels_two_to_six_are_headings() {
    assert_eq!(detect_level("## 2024.01.01"), Some(2));
    assert_eq!(detect_level("### Daily Summary"), Some(3));
    assert_eq!(detect_level("###### Deep"), Some(6));
}

#[test]
fn test_title_and_overlong_runs_are_not_headings() {
    assert_eq!(detect_level("# My Notes"), None, "level 1 is the document title");
    assert_eq!(detect_level("####### Seven"), None);
    assert_eq!(detect_level("plain text"), None);
    assert_eq!(detect_level(""), None);
}

#[test]
fn test_marker_needs_whitespace() {
    assert_eq!(detect_level("##nospace"), None);
    assert_eq!(detect_level("##"), None);
    assert_eq!(detect_level("##\tTabbed"), Some(2));
}

#[test]
fn test_indented_heading_is_detected() {
    assert_eq!(detect_level("  ### Indented"), Some(3));
}

#[test]
fn test_detection_is_stable() {
    for line in ["## A", "#### B", "# C", "text ## D"] {
        assert_eq!(detect_level(line), detect_level(line));
    }
}

#[test]
fn test_heading_title_strips_markup() {
    let heading = Heading::from_line(4, "  ###   Daily Summary  ").unwrap();
    assert_eq!(heading.line_index, 4);
    assert_eq!(heading.level, 3);
    assert_eq!(heading.raw_text, "###   Daily Summary");
    assert_eq!(heading.title(), "Daily Summary");
}

#[test]
fn test_format_heading() {
    assert_eq!(format_heading(3, "Ideas").unwrap(), "### Ideas");
    assert_eq!(format_heading(1, " Title ").unwrap(), "# Title");
}

#[test]
fn test_format_heading_rejects_bad_levels() {
    assert!(matches!(
        format_heading(0, "x"),
        Err(Error::InvalidHeadingLevel(0))
    ));
    assert!(matches!(
        format_heading(7, "x"),
        Err(Error::InvalidHeadingLevel(7))
    ));
}
