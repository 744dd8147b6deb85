use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON body decoded into `T`, rejecting with an [`ApiError`].
///
/// Content type is not checked and an empty body decodes as `T::default()`,
/// so a bare `PUT` is an update with no changes.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        decode(&bytes).map(JsonBody)
    }
}

fn decode<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| ApiError::invalid_json(format!("Corpo da requisição inválido: {}", e)))
}

/// Integer `:id` path segment.
///
/// Anything that is not an integer is rejected with 400. An integer outside
/// the `i32` id range is accepted with no `value`: no row can have it, so the
/// handlers answer with the resource's 404.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordId {
    pub raw: String,
    pub value: Option<i32>,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        parse_id(raw)
    }
}

fn parse_id(raw: String) -> Result<RecordId, ApiError> {
    let digits = raw.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(&raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request(format!(
            "Identificador inválido: '{}'",
            raw
        )));
    }
    let value = raw.parse::<i32>().ok();
    Ok(RecordId { raw, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::QuestionDraft;

    #[test]
    fn empty_body_is_default() {
        let draft: QuestionDraft = decode(b"").unwrap();
        assert!(draft.enunciado.is_none());
        let draft: QuestionDraft = decode(b"  \n").unwrap();
        assert!(draft.nivel.is_none());
    }

    #[test]
    fn malformed_body_is_invalid_json() {
        let err = decode::<QuestionDraft>(b"{\"nivel\":").unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson(_)));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let err = decode::<QuestionDraft>(br#"{"nivel": 3}"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidJson(_)));
    }

    #[test]
    fn integer_ids_parse() {
        let id = parse_id("42".to_string()).unwrap();
        assert_eq!(id.value, Some(42));
        assert_eq!(parse_id("-3".to_string()).unwrap().value, Some(-3));
    }

    #[test]
    fn out_of_range_id_has_no_value() {
        let id = parse_id("99999999999".to_string()).unwrap();
        assert_eq!(id.value, None);
        assert_eq!(id.raw, "99999999999");
    }

    #[test]
    fn non_integer_ids_are_rejected() {
        for raw in ["abc", "", "-", "1.5", "12a"] {
            let err = parse_id(raw.to_string()).unwrap_err();
            assert!(matches!(err, ApiError::BadRequest(_)), "{raw}");
        }
    }
}
