use overbuddy::notice::{highlight_segments, render_plain, Notice, NoticeLevel, Segment};
use overbuddy::setup::{SetupFailure, SetupRejection};
use std::path::PathBuf;

#[test]
fn wrong_file_rejection_highlights_expected_name() {
    let rejection = SetupRejection::WrongFile {
        expected: "Battle.net Launcher.exe",
        picked: PathBuf::from("/games/launcher.exe"),
    };
    let notice = Notice::from(&rejection);

    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(
        notice.plain_text(),
        "Please select the \"Battle.net Launcher.exe\" file."
    );
    assert_eq!(
        notice.segments(),
        vec![
            Segment::Plain("Please select the ".to_string()),
            Segment::Highlight("Battle.net Launcher.exe".to_string()),
            Segment::Plain(" file.".to_string()),
        ]
    );
}

#[test]
fn malformed_failure_renders_both_highlights() {
    let failure = SetupFailure::MalformedConfigError {
        payload: "{\"error_key\":\"Disk\"}".to_string(),
        reason: "unknown variant".to_string(),
    };
    let notice = Notice::from(&failure);

    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.reportable);
    let highlights: Vec<_> = highlight_segments(&notice.text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Highlight(text) => Some(text),
            Segment::Plain(_) => None,
        })
        .collect();
    assert_eq!(
        highlights,
        vec!["{\"error_key\":\"Disk\"}".to_string(), "unknown variant".to_string()]
    );
}

#[test]
fn all_platforms_disabled_is_not_reportable() {
    let notice = Notice::from(&SetupFailure::AllPlatformsDisabled);
    assert_eq!(notice.text, "Failed to setup!");
    assert!(!notice.reportable);
}

#[test]
fn text_without_markers_is_unchanged() {
    assert_eq!(render_plain("Failed to reset."), "Failed to reset.");
    assert_eq!(
        highlight_segments("Failed to reset."),
        vec![Segment::Plain("Failed to reset.".to_string())]
    );
    assert!(highlight_segments("").is_empty());
}
