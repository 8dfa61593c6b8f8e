use serde_json::Value;
use tabled::{
    Table, Tabled,
    settings::{Style, style::HorizontalLine},
};

// Catalog listing display logic
#[derive(Tabled, Debug, PartialEq)]
pub struct MenuRow {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Id")]
    pub id: String,
}

#[derive(Tabled, Debug, PartialEq)]
pub struct ContentRow {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Id")]
    pub id: String,
}

#[derive(Tabled, Debug, PartialEq)]
pub struct ChannelRow {
    #[tabled(rename = "Channel")]
    pub name: String,
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Now")]
    pub current_program: String,
}

impl MenuRow {
    pub fn from_item(item: &Value) -> Self {
        Self {
            title: first_text(item, &["title", "name", "displayName"]),
            id: first_text(item, &["id", "pageId"]),
        }
    }
}

impl ContentRow {
    pub fn from_item(item: &Value) -> Self {
        Self {
            title: first_text(item, &["title", "name", "displayName"]),
            kind: first_text(item, &["__typename", "type"]),
            id: first_text(item, &["id", "mediaId"]),
        }
    }
}

impl ChannelRow {
    pub fn from_item(item: &Value) -> Self {
        Self {
            name: first_text(item, &["name", "title", "displayName"]),
            id: first_text(item, &["id", "channelId"]),
            current_program: current_program(item).unwrap_or_default(),
        }
    }
}

// Programs are listed from the given timestamp, so the first one is on air.
fn current_program(channel: &Value) -> Option<String> {
    let program = channel.pointer("/programs/programItems/0")?;
    let title = program.pointer("/media/title").or_else(|| program.get("title"))?;
    title.as_str().map(str::to_string)
}

fn first_text(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| item.get(*key))
        .find_map(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Finds the list to display: the value itself, or the first array it holds
/// (GraphQL connections wrap items as `{ items: [...], pageInfo }` or similar).
pub fn listed_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map
            .values()
            .find_map(Value::as_array)
            .map(|items| items.iter().collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

pub fn menu_rows(value: &Value) -> Vec<MenuRow> {
    listed_items(value).into_iter().map(MenuRow::from_item).collect()
}

pub fn content_rows(value: &Value) -> Vec<ContentRow> {
    listed_items(value)
        .into_iter()
        .map(ContentRow::from_item)
        .collect()
}

pub fn channel_rows(value: &Value) -> Vec<ChannelRow> {
    listed_items(value)
        .into_iter()
        .map(ChannelRow::from_item)
        .collect()
}

pub fn format_table<R: Tabled>(rows: Vec<R>) -> tabled::Table {
    let table_style = Style::modern()
        .horizontals([(1, HorizontalLine::inherit(Style::modern()))])
        .remove_horizontal()
        .remove_frame();

    let mut table = Table::new(rows);
    table.with(table_style);
    table
}
