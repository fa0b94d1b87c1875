/// Decoding: turn an untyped candidate into a typed command value.
///
/// Raw string values are coerced to the JSON type each schema field declares,
/// then the resulting object is handed to serde.
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::detection::ParsedCandidate;
use crate::error::DecodeError;
use crate::types::{CommandSchema, FieldType};

/// A concrete command type bound to one schema.
pub trait Command: DeserializeOwned {
    /// Wire name carried in the `request` key.
    const NAME: &'static str;

    fn schema() -> CommandSchema;
}

/// Check required fields and coerce declared fields to their types.
///
/// Undeclared fields are dropped. A field the detector left out (absent, or
/// given a bare `null`) is a [`DecodeError::MissingField`] when required.
pub fn typed_fields(
    schema: &CommandSchema,
    candidate: &ParsedCandidate,
) -> Result<Map<String, Value>, DecodeError> {
    let mut out = Map::new();
    for field in &schema.fields {
        let Some(raw) = candidate.get(&field.name) else {
            if field.required {
                return Err(DecodeError::MissingField {
                    command: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
            continue;
        };

        let value = coerce(raw, field.field_type).ok_or_else(|| DecodeError::InvalidType {
            command: schema.name.clone(),
            field: field.name.clone(),
            expected: field.field_type.as_str(),
            value: raw.to_string(),
        })?;
        out.insert(field.name.clone(), value);
    }
    Ok(out)
}

fn coerce(raw: &str, ty: FieldType) -> Option<Value> {
    let trimmed = raw.trim();
    match ty {
        FieldType::String => Some(Value::String(raw.to_string())),
        FieldType::Integer => trimmed.parse::<i64>().ok().map(Value::from),
        FieldType::Number => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        FieldType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
    }
}

/// Decode `candidate` into `C` against `schema`.
pub fn decode<C: Command>(
    schema: &CommandSchema,
    candidate: &ParsedCandidate,
) -> Result<C, DecodeError> {
    let fields = typed_fields(schema, candidate)?;
    serde_json::from_value(Value::Object(fields)).map_err(|source| DecodeError::Malformed {
        command: schema.name.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::detect_candidate;
    use crate::types::{FieldDef, UsageExample};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Resize {
        width: i64,
        scale: Option<f64>,
        keep_ratio: Option<bool>,
    }

    impl Command for Resize {
        const NAME: &'static str = "resize";

        fn schema() -> CommandSchema {
            CommandSchema::new(
                Self::NAME,
                "Resize the image.",
                vec![
                    FieldDef::required("width", "Width in px", FieldType::Integer),
                    FieldDef::optional("scale", "Scale factor", FieldType::Number),
                    FieldDef::optional("keep_ratio", "Keep aspect ratio", FieldType::Boolean),
                ],
                vec![UsageExample::new(&[("width", "640")], &["the user wants a smaller image"])],
            )
            .unwrap()
        }
    }

    fn decode_text(text: &str) -> Result<Resize, DecodeError> {
        let candidate = detect_candidate(text).unwrap();
        decode::<Resize>(&Resize::schema(), &candidate)
    }

    #[test]
    fn coerces_declared_types() {
        let r = decode_text("{'request': 'resize', 'width': '640', scale: 0.5, keep_ratio: TRUE}").unwrap();
        assert_eq!(
            r,
            Resize { width: 640, scale: Some(0.5), keep_ratio: Some(true) }
        );
    }

    #[test]
    fn missing_required_field() {
        let err = decode_text("{'request': 'resize'}").unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { ref field, .. } if field == "width"));
    }

    #[test]
    fn mistyped_field() {
        let err = decode_text("{'request': 'resize', 'width': 'wide'}").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidType { expected: "integer", .. }));
    }

    #[test]
    fn null_optional_and_extra_fields() {
        let r = decode_text("{'request': 'resize', 'width': 3, 'scale': null, 'colour': 'red'}").unwrap();
        assert_eq!(r, Resize { width: 3, scale: None, keep_ratio: None });
    }

    #[test]
    fn bare_null_on_required_field_is_missing() {
        let err = decode_text("{'request': 'resize', 'width': null}").unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { ref field, .. } if field == "width"));
    }

    #[test]
    fn quoted_null_is_an_ordinary_value() {
        let err = decode_text("{'request': 'resize', 'width': 'null'}").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidType { ref value, .. } if value == "null"));
    }
}
