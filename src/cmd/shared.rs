use clap::Args;

use crate::domain::attachment::{AttachmentSource, MatchType};
use crate::domain::story::StoryType;
use crate::workflow::story::StoryFields;

/// Flags accepted by both story commands.
#[derive(Args, Debug, Clone)]
pub struct StoryArgs {
    /// Shortcut API token sent as the Shortcut-Token header.
    #[arg(long)]
    pub access_token: String,
    #[arg(long, value_enum)]
    pub issue_type: StoryType,
    /// Due date as MM/DD/YYYY.
    #[arg(long)]
    pub deadline: Option<String>,
    #[arg(long)]
    pub estimate: Option<i64>,
    /// Creation date as MM/DD/YYYY.
    #[arg(long)]
    pub created_at: Option<String>,
    #[arg(long)]
    pub external_id: Option<String>,
    /// List of URLs, e.g. "['https://example.com/a']".
    #[arg(long)]
    pub external_links: Option<String>,
    #[arg(long)]
    pub epic_id: Option<i64>,
    /// JSON sent as the story's custom_fields.
    #[arg(long)]
    pub custom_json: Option<String>,
    #[command(flatten)]
    pub attachment: AttachmentArgs,
}

impl StoryArgs {
    /// Splits the flags into story fields and the optional attachment source.
    pub fn into_parts(
        self,
        name: Option<String>,
        description: Option<String>,
        project_id: Option<i64>,
    ) -> (StoryFields, Option<AttachmentSource>) {
        let fields = StoryFields {
            name,
            description,
            story_type: Some(self.issue_type),
            estimate: self.estimate,
            deadline: self.deadline,
            created_at: self.created_at,
            external_id: self.external_id,
            external_links: self.external_links,
            project_id,
            epic_id: self.epic_id,
            custom_json: self.custom_json,
        };
        (fields, self.attachment.into_source())
    }
}

#[derive(Args, Debug, Clone)]
pub struct AttachmentArgs {
    /// File to attach, or a pattern when matching by regex.
    #[arg(long)]
    pub source_file_name: Option<String>,
    #[arg(long, default_value = "")]
    pub source_folder_name: String,
    #[arg(long, value_enum, default_value_t = MatchType::ExactMatch)]
    pub source_file_name_match_type: MatchType,
}

impl AttachmentArgs {
    pub fn into_source(self) -> Option<AttachmentSource> {
        self.source_file_name.map(|file_name| AttachmentSource {
            file_name,
            folder: self.source_folder_name,
            match_type: self.source_file_name_match_type,
        })
    }
}
