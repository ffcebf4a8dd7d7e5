use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::story::{ResourceId, StoryRecord};
use crate::error::{AppError, AppResult};

/// Per-service folder layout under the shared artifacts directory:
/// `<root>/<service>-blueprints/{logs,responses,variables}`.
#[derive(Debug, Clone)]
pub struct ArtifactFolders {
    pub base: PathBuf,
    pub logs: PathBuf,
    pub responses: PathBuf,
    pub variables: PathBuf,
}

impl ArtifactFolders {
    pub fn initialize(root: &Path, service_name: &str) -> AppResult<Self> {
        let base = root.join(format!("{service_name}-blueprints"));
        let folders = Self {
            logs: base.join("logs"),
            responses: base.join("responses"),
            variables: base.join("variables"),
            base,
        };
        for folder in [&folders.logs, &folders.responses, &folders.variables] {
            fs::create_dir_all(folder)?;
        }
        debug!("Artifact folders ready under {}", folders.base.display());
        Ok(folders)
    }

    /// The id becomes part of a file name, so only plain ids are accepted.
    pub fn response_path(&self, story: &StoryRecord) -> AppResult<PathBuf> {
        let is_plain = match &story.id {
            ResourceId::Number(_) => true,
            ResourceId::Text(id) => {
                !id.is_empty()
                    && id
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            }
        };
        if !is_plain {
            return Err(AppError::MalformedResponse(format!(
                "story id '{}' cannot be used in a file name",
                story.id
            )));
        }
        Ok(self
            .responses
            .join(format!("create_story_{}_response.json", story.id)))
    }

    /// Writes the raw story response and returns where it landed.
    pub fn write_response(&self, story: &StoryRecord) -> AppResult<PathBuf> {
        let path = self.response_path(story)?;
        let data = serde_json::to_string_pretty(&story.raw).map_err(|err| {
            AppError::MalformedResponse(format!("failed to serialize response: {err}"))
        })?;
        fs::write(&path, data)?;
        Ok(path)
    }
}
