use crate::api::error::{Result, check_errors};
use crate::api::graphql::PersistedQuery;
use crate::api::session::TeliaSession;
use crate::api::transport::Transport;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MyListKind {
    Series,
    Media,
}

impl MyListKind {
    /// Series ids carry an "s" prefix; everything else is a single media item.
    pub fn of(media_id: &str) -> Self {
        if media_id.starts_with('s') {
            MyListKind::Series
        } else {
            MyListKind::Media
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MyListKind::Series => "SERIES",
            MyListKind::Media => "MEDIA",
        }
    }
}

impl<T: Transport> TeliaSession<T> {
    async fn my_list_mutation(&self, query: PersistedQuery, media_id: &str) -> Result<Value> {
        let variables = json!({
            "id": media_id,
            "type": MyListKind::of(media_id).as_str()
        });
        let req = self
            .with_auth(query.post_request(variables))?
            .header("client-name", "web");

        let res = self.transport.execute(req).await?;
        check_errors(&res.body)?;
        tracing::info!(%media_id, operation = query.operation_name(), "Updated my list");

        Ok(res.body)
    }

    pub async fn add_to_my_list(&self, media_id: &str) -> Result<Value> {
        self.my_list_mutation(PersistedQuery::AddToMyList, media_id)
            .await
    }

    pub async fn remove_from_my_list(&self, media_id: &str) -> Result<Value> {
        self.my_list_mutation(PersistedQuery::RemoveFromMyList, media_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_id_prefix() {
        assert_eq!(MyListKind::of("s123"), MyListKind::Series);
        assert_eq!(MyListKind::of("m123"), MyListKind::Media);
        assert_eq!(MyListKind::of("S123"), MyListKind::Media);
        assert_eq!(MyListKind::of(""), MyListKind::Media);
    }
}
