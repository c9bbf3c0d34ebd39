//! Turns a stored asset reference into something a browser can load.

pub const DEFAULT_PLACEHOLDER: &str = "https://via.placeholder.com/300x200?text=No+Image";

/// Resolves asset references against the public API origin.
///
/// References that already carry an `http://` or `https://` scheme are returned
/// untouched; anything else is treated as a path relative to `base_origin`. The
/// result is not validated.
#[derive(Debug, Clone, Default)]
pub struct DisplayUrlResolver {
    base_origin: String,
}

impl DisplayUrlResolver {
    pub fn new(base_origin: impl Into<String>) -> Self {
        Self {
            base_origin: base_origin.into(),
        }
    }

    pub fn resolve(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw.filter(|r| !r.is_empty())?;

        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Some(raw.to_string());
        }

        Some(format!("{}{}", self.base_origin, raw))
    }

    pub fn resolve_or(&self, raw: Option<&str>, fallback: &str) -> String {
        self.resolve(raw).unwrap_or_else(|| fallback.to_string())
    }

    pub fn resolve_or_placeholder(&self, raw: Option<&str>) -> String {
        self.resolve_or(raw, DEFAULT_PLACEHOLDER)
    }
}
