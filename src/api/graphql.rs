use crate::api::transport::Request;
use serde_json::{Value, json};

pub const GRAPHQL_HOST: &str = "graphql-telia.t6a.net";
const GRAPHQL_PATH: &str = "/graphql";

/// Queries registered server-side; only the operation name and hash go over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistedQuery {
    MainMenu,
    Search,
    Page,
    TvChannels,
    TvChannel,
    StorePage,
    Panel,
    CdpSeries,
    CdpSeason,
    AddToMyList,
    RemoveFromMyList,
}

impl PersistedQuery {
    pub const fn operation_name(self) -> &'static str {
        match self {
            PersistedQuery::MainMenu => "getMainMenu",
            PersistedQuery::Search => "search2",
            PersistedQuery::Page => "getPage",
            PersistedQuery::TvChannels => "getTvChannels",
            PersistedQuery::TvChannel => "getTvChannel",
            PersistedQuery::StorePage => "getStorePage",
            PersistedQuery::Panel => "getPanel",
            PersistedQuery::CdpSeries => "getCdpSeries",
            PersistedQuery::CdpSeason => "getCdpSeasonPanel",
            PersistedQuery::AddToMyList => "addToMyList",
            PersistedQuery::RemoveFromMyList => "removeFromMyList",
        }
    }

    pub const fn sha256_hash(self) -> &'static str {
        match self {
            PersistedQuery::MainMenu => {
                "74a6ce5661c0afdf5bfa34cc01a38382f0a65faa35b71dd4b8ac7702b968ef5e"
            }
            PersistedQuery::Search => {
                "b6dc1cdd0aa4757cb115f4aa7e13d73c02526bf84bc22d1a609aa777b9530063"
            }
            PersistedQuery::Page => {
                "a31270a3fee56b71eae50f27af934cd447dee19bba5fb4359b883756b0b540b5"
            }
            PersistedQuery::TvChannels => {
                "eac2953c16d1077ef980b003c21b779d18b0d9b912c2cdb2a797be5d14865bba"
            }
            PersistedQuery::TvChannel => {
                "dc6745d8e00726941f6bef40de7fcb28335027cbd404fe0fe16bd933359d3012"
            }
            PersistedQuery::StorePage => {
                "2ad5fafd846ce292b22cb126fd03ce5404643cf8c88370ab7837b9dc69e2b2f7"
            }
            PersistedQuery::Panel => {
                "0bd6167e23406bf60133b46073c35355865c1e041f29072c8034680067799521"
            }
            PersistedQuery::CdpSeries => {
                "1b0198be55a3f9dbe722826910dd45d14fd3d11a35c45d8e20b8cebd66c6c37c"
            }
            PersistedQuery::CdpSeason => {
                "5db2beadf8031eea863afdb00e6aa8c3551356fc0dac428515b2ef8a1b7055ac"
            }
            PersistedQuery::AddToMyList => {
                "a8369da660da6f45e0eabd53756effcd4c40668f1794a853c298c29e7903c7f9"
            }
            PersistedQuery::RemoveFromMyList => {
                "630c2f99d817682d4f15d41084cdc2f40dc158a5dae0bd2ab0e815ce268da277"
            }
        }
    }

    pub fn extensions(self) -> Value {
        json!({
            "persistedQuery": {
                "version": 1,
                "sha256Hash": self.sha256_hash()
            }
        })
    }

    /// GET form: variables and extensions travel as JSON-encoded query parameters.
    pub fn get_request(self, variables: Value) -> Request {
        Request::get(GRAPHQL_HOST, GRAPHQL_PATH)
            .query("operationName", self.operation_name())
            .query("variables", variables.to_string())
            .query("extensions", self.extensions().to_string())
    }

    /// POST form used by mutations.
    pub fn post_request(self, variables: Value) -> Request {
        Request::post(GRAPHQL_HOST, GRAPHQL_PATH).payload(json!({
            "operationName": self.operation_name(),
            "variables": variables,
            "extensions": self.extensions()
        }))
    }
}
