use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TeliaError>;

#[derive(Error, Debug)]
pub enum TeliaError {
    /// Failure reported by the backend inside a response body.
    #[error("Telia API error: {0}")]
    Api(String),

    /// Non-200 status whose body carried no recognisable error envelope.
    #[error("Request returned unsuccessful status {0}")]
    Status(u16),

    #[error("Token bundle has no '{0}'; log in first")]
    MissingToken(&'static str),

    #[error("Unexpected response shape: missing '{0}'")]
    UnexpectedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TeliaError {
    /// The backend answered and refused the request, as opposed to a transport failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, TeliaError::Api(_) | TeliaError::Status(_))
    }

    /// Stored credentials are unusable and a token refresh or fresh login may recover.
    pub fn needs_login(&self) -> bool {
        self.is_rejection() || matches!(self, TeliaError::MissingToken(_))
    }
}

type Matcher = fn(&Value) -> Option<String>;

// Sub-cases tried in order when the body carries an "errors" key.
const ERRORS_MATCHERS: [Matcher; 3] = [object_message, first_extension_code, first_message];

fn object_message(errors: &Value) -> Option<String> {
    errors.get("message").map(render)
}

fn first_extension_code(errors: &Value) -> Option<String> {
    errors.get(0)?.get("extensions")?.get("code").map(render)
}

fn first_message(errors: &Value) -> Option<String> {
    errors.get(0)?.get("message").map(render)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Inspects a decoded response body and turns any known error envelope into
/// `TeliaError::Api`. Bodies without an envelope pass through untouched.
pub fn check_errors(body: &Value) -> Result<()> {
    match extract_error_message(body) {
        Some(message) => {
            tracing::warn!(%message, "Backend reported an error");
            Err(TeliaError::Api(message))
        }
        None => Ok(()),
    }
}

fn extract_error_message(body: &Value) -> Option<String> {
    let obj = body.as_object()?;

    if let Some(errors) = obj.get("errors") {
        let message = ERRORS_MATCHERS
            .iter()
            .find_map(|matcher| matcher(errors))
            .unwrap_or_else(|| render(errors));
        return Some(message);
    }

    if let Some(message) = obj.get("errorMessage") {
        return Some(render(message));
    }

    if let Some(code) = obj.get("errorCode") {
        return Some(render(obj.get("message").unwrap_or(code)));
    }

    None
}
