use crate::api::error::{Result, TeliaError, check_errors};
use crate::api::transport::{HttpTransport, Request, Transport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

pub const OTT_API_HOST: &str = "ottapi.prod.telia.net";
const LOGIN_PATH: &str = "/web/se/logingateway/rest/v1/login";
const REFRESH_PATH: &str = "/web/se/logingateway/rest/v1/login/refresh";
const LOGOUT_PATH: &str = "/web/se/logingateway/rest/secure/v1/logout";
const PROVISION_PATH: &str = "/web/se/tvclientgateway/rest/secure/v1/provision";

const DEVICE_TYPE: &str = "WEB";
pub(crate) const WHITE_LABEL_BRAND: &str = "TELIA";

/// Token bundle exactly as the login gateway returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenData(pub Map<String, Value>);

impl TokenData {
    pub fn access_token(&self) -> Option<&str> {
        self.0.get("accessToken").and_then(Value::as_str)
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.0.get("refreshToken").and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_body(body: &Value) -> Self {
        Self(body.as_object().cloned().unwrap_or_default())
    }
}

/// Identity a caller brings to a new client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(rename = "bootUUID")]
    pub boot_uuid: String,
    #[serde(rename = "deviceUUID")]
    pub device_uuid: String,
    #[serde(default)]
    pub token_data: TokenData,
}

pub struct TeliaSession<T = HttpTransport> {
    pub transport: T,
    pub boot_id: String,
    pub device_id: String,
    pub session_id: String,
    pub token_data: TokenData,
}

impl TeliaSession<HttpTransport> {
    pub fn new(user_data: UserData) -> Result<Self> {
        Ok(Self::with_transport(user_data, HttpTransport::new()?))
    }
}

impl<T: Transport> TeliaSession<T> {
    pub fn with_transport(user_data: UserData, transport: T) -> Self {
        Self {
            transport,
            boot_id: user_data.boot_uuid,
            device_id: user_data.device_uuid,
            session_id: Uuid::new_v4().to_string(),
            token_data: user_data.token_data,
        }
    }

    pub(crate) fn bearer(&self) -> Result<String> {
        let token = self
            .token_data
            .access_token()
            .ok_or(TeliaError::MissingToken("accessToken"))?;
        Ok(format!("Bearer {token}"))
    }

    pub(crate) fn with_boot_id(&self, request: Request) -> Request {
        request.header("tv-client-boot-id", self.boot_id.as_str())
    }

    pub(crate) fn with_auth(&self, request: Request) -> Result<Request> {
        Ok(self
            .with_boot_id(request)
            .header("Authorization", self.bearer()?))
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<TokenData> {
        let req = self.with_boot_id(Request::post(OTT_API_HOST, LOGIN_PATH)).payload(json!({
            "deviceId": self.device_id,
            "username": username,
            "password": password,
            "deviceType": DEVICE_TYPE,
            "whiteLabelBrand": WHITE_LABEL_BRAND
        }));

        let res = self.transport.execute(req).await?;
        check_errors(&res.body)?;

        self.token_data = TokenData::from_body(&res.body);
        tracing::info!("Logged in as {username}");
        Ok(self.token_data.clone())
    }

    // Provisioning rejects stale tokens; a failure here leaves the session logged out.
    pub async fn validate_login(&self) -> Result<()> {
        let req = self
            .with_auth(Request::post(OTT_API_HOST, PROVISION_PATH))?
            .payload(json!({
                "deviceId": self.device_id,
                "uiVersion": "100e633",
                "nativeVersion": "N/A",
                "coreVersion": "7.0.4",
                "uiName": "telia-web",
                "platformName": platform_name()
            }));

        let res = self.transport.execute(req).await?;
        if res.is_ok() {
            return Ok(());
        }

        tracing::warn!(status = res.status, "Login validation failed; logging out");
        self.logout().await?;
        check_errors(&res.body)?;
        Err(TeliaError::Status(res.status))
    }

    pub async fn logout(&self) -> Result<()> {
        let req = self.with_boot_id(Request::delete(OTT_API_HOST, LOGOUT_PATH));
        self.transport.execute(req).await?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub async fn refresh_token(&mut self) -> Result<TokenData> {
        let refresh_token = self
            .token_data
            .refresh_token()
            .ok_or(TeliaError::MissingToken("refreshToken"))?;

        let req = self.with_boot_id(Request::post(OTT_API_HOST, REFRESH_PATH)).payload(json!({
            "deviceId": self.device_id,
            "deviceType": DEVICE_TYPE,
            "refreshToken": refresh_token
        }));

        let res = self.transport.execute(req).await?;
        check_errors(&res.body)?;

        self.token_data = TokenData::from_body(&res.body);
        tracing::info!("Refreshed access token");
        Ok(self.token_data.clone())
    }

    /// Validates the stored tokens, refreshing them or logging in again when they
    /// are rejected. Returns the new bundle if the tokens changed.
    pub async fn restore(&mut self, username: &str, password: &str) -> Result<Option<TokenData>> {
        match self.validate_login().await {
            Ok(()) => {
                tracing::debug!("Stored session is valid");
                return Ok(None);
            }
            Err(e) if e.needs_login() => {
                tracing::info!("Stored session unusable ({e}); refreshing token");
            }
            Err(e) => return Err(e),
        }

        match self.refresh_token().await {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) => {
                tracing::info!("Token refresh failed ({e}); logging in again");
                self.login(username, password).await.map(Some)
            }
        }
    }
}

/// Operating system name in the form the backend expects ("Linux", "Darwin", "Windows").
pub fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        other => other,
    }
}

/// Walks `path` through nested objects, failing with the dotted path on the first gap.
pub(crate) fn select(mut value: Value, path: &[&str]) -> Result<Value> {
    for (depth, key) in path.iter().enumerate() {
        value = match value {
            Value::Object(mut map) => map.remove(*key),
            _ => None,
        }
        .ok_or_else(|| TeliaError::UnexpectedResponse(path[..=depth].join(".")))?;
    }
    Ok(value)
}

/// Like `select`, but the subtree must be a list.
pub(crate) fn select_array(value: Value, path: &[&str]) -> Result<Vec<Value>> {
    match select(value, path)? {
        Value::Array(items) => Ok(items),
        _ => Err(TeliaError::UnexpectedResponse(path.join("."))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_data_uses_plugin_field_names() {
        let user_data: UserData = serde_json::from_value(json!({
            "bootUUID": "boot-1",
            "deviceUUID": "device-1",
            "tokenData": { "accessToken": "abc", "refreshToken": "def", "validTo": 1 }
        }))
        .unwrap();

        assert_eq!(user_data.boot_uuid, "boot-1");
        assert_eq!(user_data.device_uuid, "device-1");
        assert_eq!(user_data.token_data.access_token(), Some("abc"));
        assert_eq!(user_data.token_data.refresh_token(), Some("def"));
    }

    #[test]
    fn token_data_defaults_to_empty() {
        let user_data: UserData =
            serde_json::from_value(json!({ "bootUUID": "b", "deviceUUID": "d" })).unwrap();
        assert!(user_data.token_data.is_empty());
        assert_eq!(user_data.token_data.access_token(), None);
    }

    #[test]
    fn select_walks_nested_objects() {
        let body = json!({ "data": { "mainMenu": { "items": [1, 2] } } });
        let items = select(body, &["data", "mainMenu", "items"]).unwrap();
        assert_eq!(items, json!([1, 2]));
    }

    #[test]
    fn select_reports_missing_path() {
        let body = json!({ "data": { "mainMenu": null } });
        match select(body, &["data", "mainMenu", "items"]) {
            Err(TeliaError::UnexpectedResponse(path)) => assert_eq!(path, "data.mainMenu.items"),
            other => panic!("Expected UnexpectedResponse, got {other:?}"),
        }
    }

    #[test]
    fn select_array_rejects_non_list() {
        let body = json!({ "streams": { "url": "x" } });
        match select_array(body, &["streams"]) {
            Err(TeliaError::UnexpectedResponse(path)) => assert_eq!(path, "streams"),
            other => panic!("Expected UnexpectedResponse, got {other:?}"),
        }
    }
}
