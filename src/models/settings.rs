use serde::Serialize;

/// User-facing appearance settings. The accent color is returned to the
/// caller as a value; applying it to any rendering surface is the UI
/// layer's concern.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub accent_color: String,
    pub updated_at: String,
}
