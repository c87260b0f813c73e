//! WASM bindings for activity screenshot field extraction.
//!
//! OCR runs in the browser; these bindings turn the recognized text into
//! activity records.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use actscan_core::extract::ActivityExtractor as _;
use actscan_core::{ExtractionError, Field, OcrResult, RecordAssembler, RuleExtractor, TextBox};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Serialize to plain JS objects (not `Map`s), which flattened structs need.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn invalid_input(message: &str) -> JsValue {
    JsValue::from_str(&ExtractionError::InvalidInput(message.to_string()).to_string())
}

/// Extract activity fields from OCR text.
#[wasm_bindgen(js_name = extractActivityFromText)]
pub fn extract_activity_from_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&actscan_core::extract(text))
}

/// Extract activity fields from an arbitrary JS value.
///
/// Anything other than a string is rejected.
#[wasm_bindgen(js_name = extractActivity)]
pub fn extract_activity(value: JsValue) -> Result<JsValue, JsValue> {
    match value.as_string() {
        Some(text) => extract_activity_from_text(&text),
        None => Err(invalid_input(&format!(
            "expected OCR text as a string, got {}",
            value.js_typeof().as_string().unwrap_or_default()
        ))),
    }
}

/// Build records from `[[file, text], ...]`, keeping input order.
#[wasm_bindgen(js_name = assembleRecords)]
pub fn assemble_records(pages: JsValue) -> Result<JsValue, JsValue> {
    let pages: Vec<(String, String)> = serde_wasm_bindgen::from_value(pages).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str("assembleRecords: malformed input"));
        invalid_input(&format!("expected an array of [file, text] pairs: {}", e))
    })?;

    to_js(&RecordAssembler::new().assemble(pages))
}

/// Activity extractor class for browser use.
#[wasm_bindgen]
pub struct ActivityExtractor {
    extractor: RuleExtractor,
}

#[wasm_bindgen]
impl ActivityExtractor {
    /// Create a new activity extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: RuleExtractor::new(),
        }
    }

    /// Extract activity fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extractor.extract(text))
    }

    /// Extract a full record for one image.
    #[wasm_bindgen(js_name = extractRecord)]
    pub fn extract_record(&self, file: &str, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extractor.extract_record(file, text))
    }

    /// Get extraction result with per-field matches and timing.
    #[wasm_bindgen(js_name = extractWithMetadata)]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extractor.extract_detailed(text))
    }

    /// JSON keys of every extractable field, in record order.
    #[wasm_bindgen(js_name = fieldKeys)]
    pub fn field_keys() -> js_sys::Array {
        Field::ALL
            .iter()
            .map(|f| JsValue::from_str(f.key()))
            .collect()
    }
}

impl Default for ActivityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// OCR result from browser-side processing.
#[wasm_bindgen]
pub struct OcrResultJs {
    boxes: Vec<TextBox>,
    text: String,
}

#[wasm_bindgen]
impl OcrResultJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            boxes: Vec::new(),
            text: String::new(),
        }
    }

    /// Add a text box to the result.
    #[wasm_bindgen(js_name = addBox)]
    #[allow(clippy::too_many_arguments)]
    pub fn add_box(
        &mut self,
        text: &str,
        x1: f32, y1: f32,
        x2: f32, y2: f32,
        x3: f32, y3: f32,
        x4: f32, y4: f32,
        confidence: f32,
    ) {
        self.boxes.push(TextBox {
            text: text.to_string(),
            bbox: [x1, y1, x2, y2, x3, y3, x4, y4],
            confidence,
        });
    }

    /// Set the full text, overriding the boxes.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Get the full text; without an explicit text, boxes in reading order.
    #[wasm_bindgen(js_name = getText)]
    pub fn get_text(&self) -> String {
        if self.text.is_empty() {
            OcrResult::from_boxes(self.boxes.clone(), (0, 0), 0).text
        } else {
            self.text.clone()
        }
    }

    /// Mean box confidence, if any boxes were added.
    #[wasm_bindgen(js_name = meanConfidence)]
    pub fn mean_confidence(&self) -> Option<f32> {
        OcrResult::from_boxes(self.boxes.clone(), (0, 0), 0).mean_confidence()
    }

    /// Extract an activity record for this OCR result.
    #[wasm_bindgen(js_name = extractActivity)]
    pub fn extract_activity(&self, file: &str) -> Result<JsValue, JsValue> {
        to_js(&RuleExtractor::new().extract_record(file, &self.get_text()))
    }
}

impl Default for OcrResultJs {
    fn default() -> Self {
        Self::new()
    }
}
