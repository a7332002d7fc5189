//! Token request body parsing.
//!
//! The parser is chosen by the declared content type. Without a usable
//! content type the body is tried as JSON first, then as form data.

use mime::Mime;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRequestBody {
    pub grant_type: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    #[error("malformed json body: {0}")]
    Json(String),
    #[error("json body is not an object")]
    NotAnObject,
    #[error("malformed form body: {0}")]
    Form(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Form,
}

impl BodyFormat {
    /// `None` for missing, unparsable or unrecognised content types.
    pub fn from_content_type(content_type: Option<&str>) -> Option<Self> {
        let mime = content_type?.parse::<Mime>().ok()?;
        if mime.type_() != mime::APPLICATION {
            return None;
        }
        if mime.subtype() == mime::JSON || mime.suffix().is_some_and(|suffix| suffix == mime::JSON) {
            Some(BodyFormat::Json)
        } else if mime.subtype() == mime::WWW_FORM_URLENCODED {
            Some(BodyFormat::Form)
        } else {
            None
        }
    }

    pub fn parse(self, body: &[u8]) -> Result<TokenRequestBody, BodyError> {
        match self {
            BodyFormat::Json => parse_json(body),
            BodyFormat::Form => parse_form(body),
        }
    }
}

pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<TokenRequestBody, BodyError> {
    match BodyFormat::from_content_type(content_type) {
        Some(format) => format.parse(body),
        None => parse_json(body).or_else(|e| {
            debug!("body is not json ({}), trying form encoding", e);
            parse_form(body)
        }),
    }
}

fn parse_json(body: &[u8]) -> Result<TokenRequestBody, BodyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TokenRequestBody::default());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| BodyError::Json(e.to_string()))?;
    let object = value.as_object().ok_or(BodyError::NotAnObject)?;

    Ok(TokenRequestBody {
        grant_type: object
            .get("grant_type")
            .and_then(Value::as_str)
            .map(str::to_owned),
    })
}

fn parse_form(body: &[u8]) -> Result<TokenRequestBody, BodyError> {
    if std::str::from_utf8(body).is_err() {
        return Err(BodyError::Form("body is not valid utf-8".to_string()));
    }
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(body).map_err(|e| BodyError::Form(e.to_string()))?;

    Ok(TokenRequestBody {
        grant_type: pairs
            .into_iter()
            .find(|(key, _)| key == "grant_type")
            .map(|(_, value)| value),
    })
}
