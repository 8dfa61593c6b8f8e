use crate::api::error::{Result, check_errors};
use crate::api::graphql::PersistedQuery;
use crate::api::session::{TeliaSession, select, select_array};
use crate::api::transport::Transport;
use serde_json::{Value, json};

// Programs fetched per channel alongside the channel list.
const PROGRAM_LIMIT: u32 = 3;

/// Paging for the channel list. Defaults match the web client's first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelQuery {
    pub timestamp: i64,
    pub limit: u32,
    pub offset: u32,
}

impl ChannelQuery {
    pub fn at(timestamp: i64) -> Self {
        Self {
            timestamp,
            limit: 3,
            offset: 0,
        }
    }
}

impl<T: Transport> TeliaSession<T> {
    async fn graphql_get(&self, query: PersistedQuery, variables: Value) -> Result<Value> {
        let req = self
            .with_auth(query.get_request(variables))?
            .header("client-name", "web")
            .header("x-country", "SE");

        tracing::debug!(operation = query.operation_name(), "Running persisted query");
        let res = self.transport.execute(req).await?;
        check_errors(&res.body)?;

        Ok(res.body)
    }

    pub async fn get_main_menu(&self) -> Result<Value> {
        let body = self.graphql_get(PersistedQuery::MainMenu, json!({})).await?;
        select(body, &["data", "mainMenu", "items"])
    }

    pub async fn search(&self, query: &str, limit: u32, offset: u32) -> Result<Value> {
        let variables = json!({
            "q": query,
            "limit": limit,
            "offset": offset,
            "searchRentalsType": "ALL",
            "searchSubscriptionType": "IN_SUBSCRIPTION"
        });

        let body = self.graphql_get(PersistedQuery::Search, variables).await?;
        select(body, &["data", "search2"])
    }

    /// Panels of a page. Untitled panels (banners, spacers) are dropped.
    pub async fn get_page(&self, page_id: &str) -> Result<Vec<Value>> {
        let body = self
            .graphql_get(PersistedQuery::Page, json!({ "id": page_id }))
            .await?;
        let panels = select_array(body, &["data", "page", "pagePanels", "panels"])?;

        Ok(titled_panels(panels))
    }

    pub async fn get_channels(&self, query: ChannelQuery) -> Result<Value> {
        let variables = json!({
            "timestamp": query.timestamp,
            "limit": query.limit,
            "programLimit": PROGRAM_LIMIT,
            "offset": query.offset
        });

        let body = self.graphql_get(PersistedQuery::TvChannels, variables).await?;
        select(body, &["data", "channels"])
    }

    pub async fn get_channel(&self, channel_id: &str, timestamp: i64) -> Result<Value> {
        let variables = json!({
            "timestamp": timestamp,
            "offset": 0,
            "id": channel_id
        });

        let body = self.graphql_get(PersistedQuery::TvChannel, variables).await?;
        select(body, &["data", "channel"])
    }

    pub async fn get_store(&self, store_id: &str) -> Result<Value> {
        let variables = json!({ "id": store_id, "pagePanelsOffset": 0 });

        let body = self.graphql_get(PersistedQuery::StorePage, variables).await?;
        select(body, &["data", "store"])
    }

    pub async fn get_panel(&self, panel_id: &str, limit: u32, offset: u32) -> Result<Value> {
        let variables = json!({
            "id": panel_id,
            "config": {
                "limit": limit,
                "offset": offset,
                "sort": { "key": "TITLE", "order": "ASC" }
            }
        });

        let body = self.graphql_get(PersistedQuery::Panel, variables).await?;
        select(body, &["data", "panel", "selectionMediaContent"])
    }

    pub async fn get_series(&self, series_id: &str) -> Result<Value> {
        let body = self
            .graphql_get(PersistedQuery::CdpSeries, json!({ "id": series_id }))
            .await?;
        select(body, &["data", "series"])
    }

    /// Episodes of a season, newest first.
    pub async fn get_season(&self, season_id: &str) -> Result<Value> {
        let variables = json!({
            "seasonId": season_id,
            "sort": { "order": "DESC" }
        });

        let body = self.graphql_get(PersistedQuery::CdpSeason, variables).await?;
        select(body, &["data", "season", "panel", "posters", "items"])
    }
}

fn titled_panels(panels: Vec<Value>) -> Vec<Value> {
    panels
        .into_iter()
        .filter(|panel| panel.get("title").is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_query_defaults() {
        let q = ChannelQuery::at(1_700_000_000_000);
        assert_eq!(q.limit, 3);
        assert_eq!(q.offset, 0);
    }

    #[test]
    fn titled_panels_keeps_order() {
        let panels = vec![
            json!({ "id": "a", "title": "Popular" }),
            json!({ "id": "b" }),
            json!({ "id": "c", "title": null }),
            json!({ "id": "d", "title": "New" }),
        ];

        let ids: Vec<_> = titled_panels(panels)
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(ids, ["a", "c", "d"]);
    }
}
