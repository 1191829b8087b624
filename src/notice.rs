use crate::client::BridgeError;
use crate::setup::{SetupFailure, SetupRejection};

const HIGHLIGHT_OPEN: &str = "[[";
const HIGHLIGHT_CLOSE: &str = "]]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A user-facing notification. `text` may carry `[[...]]` highlight markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub reportable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Highlight(String),
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
            reportable: false,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
            reportable: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
            reportable: true,
        }
    }

    pub fn plain_text(&self) -> String {
        render_plain(&self.text)
    }

    pub fn segments(&self) -> Vec<Segment> {
        highlight_segments(&self.text)
    }
}

/// Replaces every highlight marker with a double quote.
pub fn render_plain(text: &str) -> String {
    text.replace(HIGHLIGHT_OPEN, "\"")
        .replace(HIGHLIGHT_CLOSE, "\"")
}

/// Splits `text` on `[[...]]` pairs. An unmatched opener stays in the plain text.
pub fn highlight_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find(HIGHLIGHT_OPEN) {
        let after_open = &rest[open + HIGHLIGHT_OPEN.len()..];
        let Some(close) = after_open.find(HIGHLIGHT_CLOSE) else {
            break;
        };
        if open > 0 {
            segments.push(Segment::Plain(rest[..open].to_string()));
        }
        segments.push(Segment::Highlight(after_open[..close].to_string()));
        rest = &after_open[close + HIGHLIGHT_CLOSE.len()..];
    }
    if !rest.is_empty() {
        segments.push(Segment::Plain(rest.to_string()));
    }
    segments
}

impl From<&SetupRejection> for Notice {
    fn from(rejection: &SetupRejection) -> Self {
        match rejection {
            SetupRejection::EmptySelection | SetupRejection::WrongFile { .. } => {
                Self::warning(rejection.to_string())
            }
            other => {
                let mut notice = Self::error(other.to_string());
                notice.reportable = false;
                notice
            }
        }
    }
}

impl From<&SetupFailure> for Notice {
    fn from(failure: &SetupFailure) -> Self {
        let mut notice = Self::error(failure.to_string());
        notice.reportable = !matches!(
            failure,
            SetupFailure::AllPlatformsDisabled | SetupFailure::TimedOut { .. }
        );
        notice
    }
}

impl From<&BridgeError> for Notice {
    fn from(error: &BridgeError) -> Self {
        Self::error(error.to_string())
    }
}
