use crate::schema::Background;

/// Background matching `current`, falling back to the first known background.
pub fn resolve_active_background<'a>(
    backgrounds: &'a [Background],
    current: Option<&str>,
) -> Option<&'a Background> {
    current
        .and_then(|id| backgrounds.iter().find(|background| background.id == id))
        .or_else(|| backgrounds.first())
}
