use std::sync::Arc;

use crate::artifacts::ArtifactFolders;
use crate::services::StoryTrackerService;

#[derive(Clone)]
pub struct AppContext {
    pub story_tracker: Arc<dyn StoryTrackerService>,
    pub artifacts: ArtifactFolders,
}

impl AppContext {
    pub fn new(story_tracker: Arc<dyn StoryTrackerService>, artifacts: ArtifactFolders) -> Self {
        Self {
            story_tracker,
            artifacts,
        }
    }
}
