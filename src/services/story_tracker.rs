use std::path::Path;

use async_trait::async_trait;

use crate::domain::story::{NamedEntity, ResourceId, StoryPayload, StoryRecord};
use crate::error::AppResult;

#[async_trait]
pub trait StoryTrackerService: Send + Sync {
    async fn create_story(&self, payload: &StoryPayload) -> AppResult<StoryRecord>;
    async fn update_story(&self, story_id: i64, payload: &StoryPayload) -> AppResult<StoryRecord>;
    async fn upload_file(&self, path: &Path) -> AppResult<ResourceId>;
    async fn list_labels(&self) -> AppResult<Vec<NamedEntity>>;
    async fn list_members(&self) -> AppResult<Vec<NamedEntity>>;
}
