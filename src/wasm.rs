//! WASM bindings for pseudotex
//!
//! This module provides JavaScript-accessible functions for pseudocode conversion.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{BraceStyle, OutputMode, RenderOptions};

/// Conversion options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize, Default)]
pub struct ConvertOptions {
    /// `"math"` (default) or `"verbatim"`
    #[serde(default)]
    pub mode: Option<String>,
    /// `"inline"` or `"diagram"`; defaults to the mode's own style
    #[serde(default)]
    pub braces: Option<String>,
    /// Escape character for verbatim output
    #[serde(default)]
    pub escape_char: Option<String>,
    #[serde(default)]
    pub tab_size: Option<usize>,
    /// Fail on unclassified input instead of passing it through
    #[serde(default)]
    pub strict: bool,
}

#[cfg(feature = "wasm")]
impl ConvertOptions {
    fn to_render_options(&self) -> Result<RenderOptions, String> {
        let mut options = RenderOptions::default();
        if let Some(ref mode) = self.mode {
            options.mode = mode.parse::<OutputMode>()?;
        }
        if let Some(ref braces) = self.braces {
            options.braces = Some(braces.parse::<BraceStyle>()?);
        }
        if let Some(c) = self.escape_char.as_deref().and_then(|s| s.chars().next()) {
            options.escape_char = c;
        }
        if let Some(tab_size) = self.tab_size {
            options.tab_size = tab_size;
        }
        options.strict_lexing = self.strict;
        Ok(options)
    }
}

/// Safely serialize a value to JsValue, returning an error object on failure.
#[cfg(feature = "wasm")]
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        let error_obj = ConvertResult::failure(format!("Serialization error: {}", e));
        serde_wasm_bindgen::to_value(&error_obj).unwrap_or(JsValue::NULL)
    })
}

/// Conversion result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The converted output
    pub output: String,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
    /// Warnings during conversion
    pub warnings: Vec<String>,
}

#[cfg(feature = "wasm")]
impl ConvertResult {
    fn failure(error: String) -> Self {
        ConvertResult {
            output: String::new(),
            success: false,
            error: Some(error),
            warnings: vec![],
        }
    }
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert pseudocode to LaTeX
///
/// # Arguments
/// * `input` - Pseudocode source, optionally ending in an annotation block
/// * `name` - Document name used to namespace diagram markers
/// * `options` - A `ConvertOptions` object; missing fields take defaults
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "convert")]
pub fn convert_wasm(input: &str, name: &str, options: JsValue) -> JsValue {
    let opts: ConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();

    let result = match opts.to_render_options() {
        Ok(render_options) => {
            match crate::pseudocode_to_latex_with_report(input, name, &render_options) {
                Ok(out) => ConvertResult {
                    warnings: out.warnings.iter().map(|w| w.to_string()).collect(),
                    output: out.content,
                    success: true,
                    error: None,
                },
                Err(e) => ConvertResult::failure(e.to_string()),
            }
        }
        Err(e) => ConvertResult::failure(e),
    };

    to_js_value(&result)
}

/// Token stream of `input` as an array of `{offset, kind, text}` objects
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "tokenize")]
pub fn tokenize_wasm(input: &str) -> JsValue {
    match crate::tokenize(input) {
        Ok(tokens) => serde_wasm_bindgen::to_value(&tokens).unwrap_or(JsValue::NULL),
        Err(_) => JsValue::NULL,
    }
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
