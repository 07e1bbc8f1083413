//! Static file resolution and MIME types.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::status::Slot;

const MIME_TYPES: &[(&str, &str)] = &[
    ("ico", "image/x-icon"),
    ("html", "text/html"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("css", "text/css"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("mp3", "audio/mpeg"),
    ("svg", "image/svg+xml"),
    ("pdf", "application/pdf"),
];

const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Returns the MIME type for a file name by extension. Unknown or missing
/// extensions are `text/plain`.
pub fn mime_type(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return DEFAULT_MIME_TYPE;
    };
    MIME_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// What a GET path without a query refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticTarget {
    /// The control page.
    Gui,
    /// The liveness probe.
    TestConnection,
    /// A status slot exposed read-only.
    Slot(Slot),
    /// A file below the web root.
    File(PathBuf),
}

/// Maps a request path onto a static target below `web_root`.
///
/// Paths that would leave the web root resolve to the control page.
pub fn resolve(path: &str, web_root: &Path) -> StaticTarget {
    let name = path.trim_start_matches('/');
    match name {
        "" => return StaticTarget::Gui,
        "test_connection" => return StaticTarget::TestConnection,
        "prefs" => return StaticTarget::Slot(Slot::Preferences),
        "canonical" => return StaticTarget::Slot(Slot::Canonical),
        "mech" => return StaticTarget::Slot(Slot::Mech),
        _ => {}
    }

    let relative = Path::new(name);
    let escapes = relative
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
    if escapes || name.contains('\\') {
        log::warn!("Refusing to serve path outside web root: {:?}", path);
        return StaticTarget::Gui;
    }

    StaticTarget::File(web_root.join(relative))
}
