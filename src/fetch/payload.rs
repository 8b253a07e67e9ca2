//! Decoding of success payloads into [`Fragment`]s.

use serde_json::Value;

use super::FetchError;
use crate::{
    config::PayloadSchema,
    fragment::{Fragment, FragmentIndex},
};

/// Decode a JSON success body according to `schema`.
///
/// # Examples
///
/// ```
/// use fragment_decoder::{config::PayloadSchema, fetch::decode_fragment};
///
/// let body = br#"{"id": 17, "index": 0, "text": "This"}"#;
/// let fragment = decode_fragment(&PayloadSchema::default(), body).expect("valid payload");
/// assert_eq!(fragment.index().get(), 0);
/// assert_eq!(fragment.text(), "This");
/// ```
///
/// # Errors
///
/// Returns [`FetchError::Payload`] when the body is not JSON, when the index is
/// missing or not a `u32`, or when the text is missing or empty.
pub fn decode_fragment(schema: &PayloadSchema, body: &[u8]) -> Result<Fragment, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| FetchError::Payload(format!("invalid JSON: {err}")))?;

    let raw_index = lookup(&value, &schema.index_pointer)?
        .as_u64()
        .ok_or_else(|| {
            FetchError::Payload(format!(
                "field {} is not a non-negative integer",
                schema.index_pointer
            ))
        })?;
    let index = FragmentIndex::try_from(raw_index).map_err(|_| {
        FetchError::Payload(format!("index {raw_index} exceeds the supported range"))
    })?;

    let text = lookup(&value, &schema.text_pointer)?
        .as_str()
        .ok_or_else(|| {
            FetchError::Payload(format!("field {} is not a string", schema.text_pointer))
        })?;
    if text.is_empty() {
        return Err(FetchError::Payload(format!(
            "field {} is empty",
            schema.text_pointer
        )));
    }

    Ok(Fragment::new(index, text))
}

fn lookup<'a>(value: &'a Value, pointer: &str) -> Result<&'a Value, FetchError> {
    value
        .pointer(pointer)
        .ok_or_else(|| FetchError::Payload(format!("missing field {pointer}")))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn decodes_nested_pointers() {
        let schema = PayloadSchema {
            index_pointer: "/fragment/position".into(),
            text_pointer: "/fragment/body".into(),
        };
        let body = br#"{"fragment": {"position": 3, "body": "test"}}"#;

        let fragment = decode_fragment(&schema, body).expect("nested payload decodes");

        assert_eq!(fragment, Fragment::new(FragmentIndex::new(3), "test"));
    }

    #[rstest]
    #[case(br#"not json"#.as_slice(), "invalid JSON")]
    #[case(br#"{"text": "a"}"#.as_slice(), "missing field /index")]
    #[case(br#"{"index": -1, "text": "a"}"#.as_slice(), "not a non-negative integer")]
    #[case(br#"{"index": 1.5, "text": "a"}"#.as_slice(), "not a non-negative integer")]
    #[case(br#"{"index": 4294967296, "text": "a"}"#.as_slice(), "exceeds")]
    #[case(br#"{"index": 0}"#.as_slice(), "missing field /text")]
    #[case(br#"{"index": 0, "text": 7}"#.as_slice(), "not a string")]
    #[case(br#"{"index": 0, "text": ""}"#.as_slice(), "is empty")]
    fn rejects_unusable_payloads(#[case] body: &[u8], #[case] reason: &str) {
        let err = decode_fragment(&PayloadSchema::default(), body).expect_err("payload rejected");

        let FetchError::Payload(message) = err else {
            panic!("expected payload error, got {err:?}");
        };
        assert!(message.contains(reason), "{message:?} should mention {reason:?}");
    }
}
