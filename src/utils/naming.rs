//! Document names used as TikZ marker namespaces

use indexmap::IndexMap;

use super::error::{ConversionError, ConversionResult};

/// Reduce a document name to the letters TikZ accepts in node names.
///
/// Digits are rejected instead of dropped: `sort1` and `sort2` would
/// otherwise share every marker.
pub fn sanitize_name(name: &str) -> ConversionResult<String> {
    if name.chars().any(|c| c.is_ascii_digit()) {
        return Err(ConversionError::naming(name, "digits are not allowed"));
    }
    let sanitized: String = name.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if sanitized.is_empty() {
        return Err(ConversionError::naming(name, "no letters left after sanitizing"));
    }
    Ok(sanitized)
}

/// Sanitized names claimed within one batch, mapped to the name that
/// claimed them first
#[derive(Debug, Default)]
pub struct NameRegistry {
    claimed: IndexMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitize `name` and reserve it for this batch.
    pub fn claim(&mut self, name: &str) -> ConversionResult<String> {
        let sanitized = sanitize_name(name)?;
        if let Some(owner) = self.claimed.get(&sanitized) {
            return Err(ConversionError::naming(
                name,
                format!("marker namespace '{}' is already used by '{}'", sanitized, owner),
            ));
        }
        self.claimed.insert(sanitized.clone(), name.to_string());
        Ok(sanitized)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
