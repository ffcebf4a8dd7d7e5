use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Bug,
    Chore,
    Feature,
}

/// Identifier issued by Shortcut. Stories, files and labels use integers,
/// members use UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(id) => write!(f, "{id}"),
            ResourceId::Text(id) => f.write_str(id),
        }
    }
}

/// Body sent to the create/update story endpoints. Unset fields are left out
/// of the serialized JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryPayload {
    pub archived: bool,
    pub move_to: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_type: Option<StoryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<ResourceId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_ids: Option<Vec<ResourceId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_ids: Option<Vec<ResourceId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_ids: Option<Vec<ResourceId>>,
}

impl Default for StoryPayload {
    fn default() -> Self {
        Self {
            archived: true,
            move_to: "first",
            name: None,
            description: None,
            story_type: None,
            estimate: None,
            deadline: None,
            created_at: None,
            external_id: None,
            external_links: None,
            project_id: None,
            epic_id: None,
            custom_fields: None,
            file_ids: None,
            label_ids: None,
            owner_ids: None,
            follower_ids: None,
        }
    }
}

/// A create/update response: the fields we act on plus the untouched body.
#[derive(Debug, Clone)]
pub struct StoryRecord {
    pub id: ResourceId,
    pub app_url: Option<String>,
    pub raw: Value,
}

impl StoryRecord {
    pub fn from_json(raw: Value) -> Option<Self> {
        let id = serde_json::from_value(raw.get("id")?.clone()).ok()?;
        let app_url = raw
            .get("app_url")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self { id, app_url, raw })
    }
}

/// A label or member as returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntity {
    pub id: ResourceId,
    pub name: String,
}
