//! Lens records: the raw backend shape, the normalized view, and decoding.
//!
//! # Decoding
//!
//! A raw record carries up to six encrypted-looking fields (`model`,
//! `maxTokens`, `imageModel`, `prompt`, `stylePrompt`, `negativePrompt`).
//! [`decode_record`] runs each through [`FieldDecryptor::decrypt_value`] and
//! only then materializes the [`Lens`], so a record is written exactly once.
//! Records share no state; [`decode_all`] is a plain ordered map.

pub mod coerce;
pub mod query;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::crypto::{CbcBackend, FieldDecryptor};

/// Errors produced while reading a lens list payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LensError {
    /// The payload is not `{ "data": [ {..}, .. ] }`.
    #[error("response is not in the expected format: {0}")]
    Format(String),
}

/// Lens record exactly as the backend sends it.
///
/// Every field is optional and loosely typed; see [`coerce`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLens {
    #[serde(rename = "_id")]
    pub id: Value,
    pub lens_id: Value,
    pub lens_name: Value,
    pub display: Value,
    pub badge: Value,
    pub premium_lens: Value,
    pub lens_credit: Value,
    pub badge_text: Value,
    pub prompt_flow: Value,
    pub quality: Value,
    pub schedule_lens_publish_time: Value,
    pub model: Value,
    pub max_tokens: Value,
    pub image_model: Value,
    pub prompt: Value,
    pub style_prompt: Value,
    pub negative_prompt: Value,
    pub approx_time: Value,
    pub civitai_steps: Value,
    #[serde(rename = "civitaiCFGScale")]
    pub civitai_cfg_scale: Value,
    pub image: Value,
    pub lens_uses: Value,
    pub updated_at: Value,
}

/// Normalized lens with encrypted fields replaced by plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lens {
    pub id: String,
    pub lens_id: String,
    pub name: String,
    pub display: bool,
    pub badge: bool,
    pub premium_lens: bool,
    pub credit_consumption: i64,
    pub badge_text: String,
    pub prompt_generation_flow: String,
    pub quality: String,
    pub scheduled_publish_time: Option<String>,
    pub image_to_text_model: String,
    pub max_tokens: i64,
    pub text_to_image_model: String,
    pub prompt: String,
    pub style_prompt: String,
    pub negative_prompt: String,
    pub approx_time: String,
    pub steps: i64,
    pub cfg_scale: f64,
    pub image: Option<String>,
    pub usage_count: i64,
    pub last_update: Option<String>,
}

/// Response body for `POST /lenses/decode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LensList {
    /// Decoded records, in payload order.
    pub data: Vec<Lens>,
}

/// Decode one raw record, decrypting its envelope fields.
pub fn decode_record<B: CbcBackend>(decryptor: &FieldDecryptor<B>, raw: RawLens) -> Lens {
    let model = decryptor.decrypt_value(raw.model);
    let max_tokens = decryptor.decrypt_value(raw.max_tokens);
    let image_model = decryptor.decrypt_value(raw.image_model);
    let prompt = decryptor.decrypt_value(raw.prompt);
    let style_prompt = decryptor.decrypt_value(raw.style_prompt);
    let negative_prompt = decryptor.decrypt_value(raw.negative_prompt);

    Lens {
        id: coerce::text(&raw.id),
        lens_id: coerce::text(&raw.lens_id),
        name: coerce::text(&raw.lens_name),
        display: coerce::flag(&raw.display),
        badge: coerce::flag(&raw.badge),
        premium_lens: coerce::flag(&raw.premium_lens),
        credit_consumption: coerce::int(&raw.lens_credit),
        badge_text: coerce::text(&raw.badge_text),
        prompt_generation_flow: coerce::text(&raw.prompt_flow),
        quality: coerce::text(&raw.quality),
        scheduled_publish_time: coerce::optional_text(&raw.schedule_lens_publish_time),
        image_to_text_model: coerce::text(&model),
        max_tokens: coerce::int(&max_tokens),
        text_to_image_model: coerce::text(&image_model),
        prompt: coerce::text(&prompt),
        style_prompt: coerce::text(&style_prompt),
        negative_prompt: coerce::text(&negative_prompt),
        approx_time: coerce::text(&raw.approx_time),
        steps: coerce::int(&raw.civitai_steps),
        cfg_scale: coerce::float(&raw.civitai_cfg_scale),
        image: coerce::optional_text(&raw.image),
        usage_count: coerce::int(&raw.lens_uses),
        last_update: coerce::optional_text(&raw.updated_at),
    }
}

/// Decode every record, preserving order.
pub fn decode_all<B: CbcBackend>(decryptor: &FieldDecryptor<B>, raws: Vec<RawLens>) -> Vec<Lens> {
    raws.into_iter()
        .map(|raw| decode_record(decryptor, raw))
        .collect()
}

/// Extract the raw records from a `{ "data": [...] }` list payload.
///
/// # Errors
///
/// Returns [`LensError::Format`] if `data` is missing, is not an array, or
/// holds a non-object element.
pub fn parse_list(payload: Value) -> Result<Vec<RawLens>, LensError> {
    let Value::Object(mut root) = payload else {
        return Err(LensError::Format("payload is not an object".into()));
    };
    let Some(Value::Array(items)) = root.remove("data") else {
        return Err(LensError::Format("missing `data` array".into()));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(LensError::Format(format!("data[{i}] is not an object")));
            }
            serde_json::from_value(item)
                .map_err(|e| LensError::Format(format!("data[{i}]: {e}")))
        })
        .collect()
}

/// Parse and decode a full list payload.
///
/// # Errors
///
/// See [`parse_list`].
pub fn decode_payload<B: CbcBackend>(
    decryptor: &FieldDecryptor<B>,
    payload: Value,
) -> Result<Vec<Lens>, LensError> {
    Ok(decode_all(decryptor, parse_list(payload)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: [u8; 16] = [0x5a; 16];
    const IV: [u8; 16] = [0x07; 16];

    fn seal(d: &FieldDecryptor, plaintext: &str) -> String {
        d.encrypt_field(plaintext, &KEY, &IV)
            .unwrap()
            .to_json_string()
    }

    fn raw(value: Value) -> RawLens {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_encrypted_fields() {
        let d = FieldDecryptor::new();
        let lens = decode_record(
            &d,
            raw(json!({
                "_id": "65f0c1",
                "lensId": "lens-42",
                "lensName": "Watercolor",
                "display": true,
                "lensCredit": "3",
                "model": seal(&d, "gpt-4o"),
                "maxTokens": seal(&d, "1024"),
                "imageModel": seal(&d, "flux-pro"),
                "prompt": seal(&d, "paint it softly"),
                "stylePrompt": "",
                "negativePrompt": seal(&d, "no text"),
                "civitaiSteps": "30",
                "civitaiCFGScale": "7.5",
                "lensUses": 12,
                "updatedAt": "2024-05-01T10:00:00.000Z"
            })),
        );

        assert_eq!(lens.id, "65f0c1");
        assert_eq!(lens.name, "Watercolor");
        assert!(lens.display);
        assert_eq!(lens.credit_consumption, 3);
        assert_eq!(lens.image_to_text_model, "gpt-4o");
        assert_eq!(lens.max_tokens, 1024);
        assert_eq!(lens.text_to_image_model, "flux-pro");
        assert_eq!(lens.prompt, "paint it softly");
        assert_eq!(lens.style_prompt, "");
        assert_eq!(lens.negative_prompt, "no text");
        assert_eq!(lens.steps, 30);
        assert_eq!(lens.cfg_scale, 7.5);
        assert_eq!(lens.usage_count, 12);
        assert_eq!(lens.last_update.as_deref(), Some("2024-05-01T10:00:00.000Z"));
    }

    #[test]
    fn legacy_plaintext_fields_pass_through() {
        let d = FieldDecryptor::new();
        let lens = decode_record(
            &d,
            raw(json!({"model": "gpt-4o", "maxTokens": 2048, "prompt": "legacy prompt"})),
        );
        assert_eq!(lens.image_to_text_model, "gpt-4o");
        assert_eq!(lens.max_tokens, 2048);
        assert_eq!(lens.prompt, "legacy prompt");
    }

    #[test]
    fn undecryptable_field_keeps_original_value() {
        let d = FieldDecryptor::new();
        let broken = r#"{"key":"00","iv":"00","encryptedData":"00"}"#;
        let lens = decode_record(&d, raw(json!({ "prompt": broken, "maxTokens": broken })));
        assert_eq!(lens.prompt, broken);
        assert_eq!(lens.max_tokens, 0);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let lens = decode_record(&FieldDecryptor::new(), RawLens::default());
        assert_eq!(lens.id, "");
        assert!(!lens.badge);
        assert_eq!(lens.credit_consumption, 0);
        assert_eq!(lens.cfg_scale, 0.0);
        assert_eq!(lens.scheduled_publish_time, None);
        assert_eq!(lens.image, None);
    }

    #[test]
    fn lens_serialises_camel_case() {
        let lens = decode_record(&FieldDecryptor::new(), RawLens::default());
        let v = serde_json::to_value(&lens).unwrap();
        assert!(v.get("imageToTextModel").is_some());
        assert!(v.get("creditConsumption").is_some());
        assert!(v.get("scheduledPublishTime").unwrap().is_null());
    }

    #[test]
    fn parse_list_requires_data_array() {
        assert!(parse_list(json!([])).is_err());
        assert!(parse_list(json!({"items": []})).is_err());
        assert!(parse_list(json!({"data": {}})).is_err());
        assert_eq!(parse_list(json!({"data": []})).unwrap().len(), 0);
    }

    #[test]
    fn parse_list_rejects_non_object_items() {
        let err = parse_list(json!({"data": [{}, 3]})).err().unwrap();
        assert!(err.to_string().contains("data[1]"));
    }

    #[test]
    fn decode_payload_preserves_order() {
        let d = FieldDecryptor::new();
        let payload = json!({"data": [
            {"lensName": "first", "prompt": seal(&d, "one")},
            {"lensName": "second", "prompt": seal(&d, "two")},
            {"lensName": "third"}
        ]});
        let lenses = decode_payload(&d, payload).unwrap();
        let names: Vec<_> = lenses.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(lenses[1].prompt, "two");
    }
}
