use crate::api::error::{Result, TeliaError, check_errors};
use crate::api::session::{
    OTT_API_HOST, TeliaSession, WHITE_LABEL_BRAND, platform_name, select_array,
};
use crate::api::transport::{Request, Response, Transport};
use serde_json::{Value, json};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const STREAMING_GATEWAY_HOST: &str = "streaminggateway.clientapi-prod.live.tv.telia.net";
const STREAMING_TICKET_PATH: &str = "/streaminggateway/rest/secure/v2/streamingticket";
const TV_CLIENT_GATEWAY_HOST: &str = "tvclientgateway-telia.clientapi-prod.live.tv.telia.net";
const STREAM_PROVISION_PATH: &str = "/tvclientgateway/rest/secure/v1/provision";
const RENTALS_HOST: &str = "atvse.telia.net";
const DRM_TYPE: &str = "WIDEVINE";

// Ticket released by `delete_stream`; the web client always targets this channel.
const TICKET_CHANNEL_ID: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamType {
    Live,
    Rental,
    Trailer,
    Vod,
    Other(String),
}

impl StreamType {
    pub fn watch_mode(&self) -> &'static str {
        match self {
            StreamType::Live => "LIVE",
            StreamType::Rental => "ONDEMAND",
            StreamType::Trailer => "TRAILER",
            StreamType::Vod | StreamType::Other(_) => "STARTOVER",
        }
    }

    pub fn access_control(&self) -> &'static str {
        match self {
            StreamType::Rental => "TRANSACTION",
            _ => "SUBSCRIPTION",
        }
    }

    fn ticket_kind(&self) -> &'static str {
        match self {
            StreamType::Live => "CHANNEL",
            _ => "MEDIA",
        }
    }

    // URL fragment that marks the preferred stream for this type, if any.
    fn preferred_url_marker(&self) -> Option<&'static str> {
        match self {
            StreamType::Trailer => Some("/trailer/"),
            StreamType::Rental | StreamType::Vod => Some("/vod/"),
            _ => None,
        }
    }
}

impl FromStr for StreamType {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "live" => Self::Live,
            "rental" => Self::Rental,
            "trailer" => Self::Trailer,
            "vod" => Self::Vod,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamType::Live => write!(f, "live"),
            StreamType::Rental => write!(f, "rental"),
            StreamType::Trailer => write!(f, "trailer"),
            StreamType::Vod => write!(f, "vod"),
            StreamType::Other(other) => write!(f, "{other}"),
        }
    }
}

impl<T: Transport> TeliaSession<T> {
    /// Registers the device for DRM playback.
    pub async fn validate_stream(&self) -> Result<()> {
        let req = self
            .with_auth(Request::post(TV_CLIENT_GATEWAY_HOST, STREAM_PROVISION_PATH))?
            .header("X-Configuration", "web")
            .header("X-Country", "se")
            .payload(json!({
                "deviceId": self.device_id,
                "drmType": DRM_TYPE,
                "category": format!("desktop_{}", platform_name())
            }));

        let res = self.transport.execute(req).await?;
        if res.is_ok() {
            return Ok(());
        }

        tracing::warn!(status = res.status, "Stream provisioning failed");
        check_errors(&res.body)?;
        Err(TeliaError::Status(res.status))
    }

    /// The web TVOD variant of a media item, if it has one.
    pub async fn get_vod(&self, video_id: &str) -> Result<Option<Value>> {
        let path = format!("/web/se/exploregateway/rest/v4/explore/media/{video_id}");
        let req = Request::get(OTT_API_HOST, path)
            .query("deviceType", "WEB")
            .query("protocols", "DASH");

        let res = self.transport.execute(req).await?;
        check_errors(&res.body)?;

        let vods = select_array(res.body, &[video_id, "assets", "vod"])?;
        Ok(select_vod(vods))
    }

    pub async fn rent_video(&self, vod_id: &str, pin_code: &str) -> Result<Value> {
        let path = format!("/rest/v1/secure_v2/mediarentals/videos/{vod_id}");
        let req = self
            .with_auth(Request::post(RENTALS_HOST, path))?
            .payload(json!({
                "deviceType": "WEB",
                "purchasePinCode": pin_code
            }));

        let res = self.transport.execute(req).await?;
        check_errors(&res.body)?;
        tracing::info!(%vod_id, "Rented video");

        Ok(res.body)
    }

    /// Requests a streaming ticket and picks the stream to play from it.
    pub async fn get_stream(
        &self,
        stream_id: &str,
        stream_type: &StreamType,
    ) -> Result<Option<Value>> {
        let path = format!(
            "{STREAMING_TICKET_PATH}/{}/{stream_id}",
            stream_type.ticket_kind()
        );
        let req = self
            .with_auth(Request::post(STREAMING_GATEWAY_HOST, path))?
            .header("client-name", "web")
            .header("X-Country", "se")
            .query("country", "SE")
            .payload(json!({
                "sessionId": self.session_id,
                "whiteLabelBrand": WHITE_LABEL_BRAND,
                "watchMode": stream_type.watch_mode(),
                "accessControl": stream_type.access_control(),
                "device": {
                    "deviceId": self.device_id,
                    "packagings": ["DASH_MP4_CTR"],
                    "drmType": DRM_TYPE,
                    "capabilities": [],
                    "screen": { "height": 1080, "width": 1920 },
                    "os": platform_name()
                },
                "preferences": {
                    "audioLanguage": ["undefined"],
                    "accessibility": []
                }
            }));

        let res = self.transport.execute(req).await?;
        check_errors(&res.body)?;

        let streams = select_array(res.body, &["streams"])?;

        Ok(select_stream(streams, stream_type))
    }

    /// Releases the channel streaming ticket held by this session.
    pub async fn delete_stream(&self) -> Result<Response> {
        let path = format!("{STREAMING_TICKET_PATH}/CHANNEL/{TICKET_CHANNEL_ID}");
        let req = self
            .with_auth(Request::delete(STREAMING_GATEWAY_HOST, path))?
            .header("client-name", "web")
            .query("sessionId", self.session_id.as_str())
            .query("whiteLabelBrand", WHITE_LABEL_BRAND)
            .query("country", "SE")
            .payload(json!({}));

        self.transport.execute(req).await
    }
}

pub fn select_vod(vods: Vec<Value>) -> Option<Value> {
    vods.into_iter().find(|vod| {
        vod.get("type").and_then(Value::as_str) == Some("TVOD")
            && vod.get("deviceType").and_then(Value::as_str) == Some("WEB")
    })
}

pub fn select_stream(streams: Vec<Value>, stream_type: &StreamType) -> Option<Value> {
    if let Some(marker) = stream_type.preferred_url_marker() {
        let found = streams.iter().position(|stream| {
            stream
                .get("url")
                .and_then(Value::as_str)
                .is_some_and(|url| url.contains(marker))
        });
        if let Some(index) = found {
            return streams.into_iter().nth(index);
        }
        tracing::warn!(%stream_type, marker, "No stream matched; falling back to default pick");
    }

    // The second stream is the one the web player picks by default.
    let index = if streams.len() > 1 { 1 } else { 0 };
    streams.into_iter().nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(urls: &[&str]) -> Vec<Value> {
        urls.iter().map(|url| json!({ "url": url })).collect()
    }

    #[test]
    fn parses_stream_types() {
        assert_eq!("live".parse::<StreamType>().unwrap(), StreamType::Live);
        assert_eq!("vod".parse::<StreamType>().unwrap(), StreamType::Vod);
        assert_eq!(
            "npvr".parse::<StreamType>().unwrap(),
            StreamType::Other("npvr".into())
        );
    }

    #[test]
    fn watch_modes_follow_web_client() {
        assert_eq!(StreamType::Live.watch_mode(), "LIVE");
        assert_eq!(StreamType::Rental.watch_mode(), "ONDEMAND");
        assert_eq!(StreamType::Trailer.watch_mode(), "TRAILER");
        assert_eq!(StreamType::Vod.watch_mode(), "STARTOVER");
        assert_eq!(StreamType::Other("x".into()).watch_mode(), "STARTOVER");
    }

    #[test]
    fn only_rentals_are_transactions() {
        assert_eq!(StreamType::Rental.access_control(), "TRANSACTION");
        assert_eq!(StreamType::Vod.access_control(), "SUBSCRIPTION");
        assert_eq!(StreamType::Live.access_control(), "SUBSCRIPTION");
    }

    #[test]
    fn trailer_picks_trailer_url() {
        let picked = select_stream(urls(&["/a/", "/trailer/x"]), &StreamType::Trailer);
        assert_eq!(picked, Some(json!({ "url": "/trailer/x" })));
    }

    #[test]
    fn rental_picks_first_vod_url() {
        let picked = select_stream(urls(&["/live/1", "/vod/1", "/vod/2"]), &StreamType::Rental);
        assert_eq!(picked, Some(json!({ "url": "/vod/1" })));
    }

    #[test]
    fn vod_without_match_falls_back_by_index() {
        let single = select_stream(urls(&["/dash/a"]), &StreamType::Vod);
        assert_eq!(single, Some(json!({ "url": "/dash/a" })));

        let pair = select_stream(urls(&["/dash/a", "/dash/b"]), &StreamType::Vod);
        assert_eq!(pair, Some(json!({ "url": "/dash/b" })));
    }

    #[test]
    fn trailer_without_match_falls_back_by_index() {
        let pair = select_stream(urls(&["/a", "/b"]), &StreamType::Trailer);
        assert_eq!(pair, Some(json!({ "url": "/b" })));

        let single = select_stream(urls(&["/a"]), &StreamType::Trailer);
        assert_eq!(single, Some(json!({ "url": "/a" })));
    }

    #[test]
    fn rental_without_match_falls_back_by_index() {
        let picked = select_stream(urls(&["/a", "/b", "/c"]), &StreamType::Rental);
        assert_eq!(picked, Some(json!({ "url": "/b" })));

        let single = select_stream(urls(&["/a"]), &StreamType::Rental);
        assert_eq!(single, Some(json!({ "url": "/a" })));
    }

    #[test]
    fn live_ignores_url_markers() {
        let picked = select_stream(urls(&["/vod/a", "/live/b", "/live/c"]), &StreamType::Live);
        assert_eq!(picked, Some(json!({ "url": "/live/b" })));
    }

    #[test]
    fn empty_stream_list_yields_none() {
        assert_eq!(select_stream(Vec::new(), &StreamType::Live), None);
    }

    #[test]
    fn vod_selection_needs_both_fields() {
        let vods = vec![
            json!({ "id": 1, "type": "TVOD", "deviceType": "MOBILE" }),
            json!({ "id": 2, "type": "SVOD", "deviceType": "WEB" }),
            json!({ "id": 3, "type": "TVOD", "deviceType": "WEB" }),
            json!({ "id": 4, "type": "TVOD", "deviceType": "WEB" }),
        ];
        assert_eq!(select_vod(vods).unwrap()["id"], 3);
    }

    #[test]
    fn vod_selection_without_match() {
        let vods = vec![json!({ "type": "EST", "deviceType": "WEB" })];
        assert_eq!(select_vod(vods), None);
    }
}
