use std::collections::HashSet;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::attachment::AttachmentSource;
use crate::domain::convert::{parse_string_list, to_shortcut_timestamp};
use crate::domain::story::{NamedEntity, ResourceId, StoryPayload, StoryRecord, StoryType};
use crate::error::{AppError, AppResult};
use crate::services::StoryTrackerService;

/// Story fields as they arrive from the command line, before conversion.
#[derive(Debug, Clone, Default)]
pub struct StoryFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub story_type: Option<StoryType>,
    pub estimate: Option<i64>,
    pub deadline: Option<String>,
    pub created_at: Option<String>,
    pub external_id: Option<String>,
    pub external_links: Option<String>,
    pub project_id: Option<i64>,
    pub epic_id: Option<i64>,
    pub custom_json: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateStoryRequest {
    pub fields: StoryFields,
    pub labels: Option<String>,
    pub owners: Option<String>,
    pub attachment: Option<AttachmentSource>,
}

#[derive(Debug, Clone)]
pub struct UpdateStoryRequest {
    pub story_public_id: i64,
    pub fields: StoryFields,
    pub followers: Option<String>,
    pub attachment: Option<AttachmentSource>,
}

pub struct StoryWorkflowOutcome {
    pub story: StoryRecord,
    pub uploaded: Vec<PathBuf>,
    pub response_path: PathBuf,
}

pub fn build_payload(fields: &StoryFields) -> AppResult<StoryPayload> {
    let custom_fields = fields
        .custom_json
        .as_deref()
        .map(|raw| {
            serde_json::from_str::<Value>(raw).map_err(|err| {
                AppError::InvalidInput(format!("--custom-json is not valid JSON: {err}"))
            })
        })
        .transpose()?;

    Ok(StoryPayload {
        name: fields.name.clone(),
        description: fields.description.clone(),
        story_type: fields.story_type,
        estimate: fields.estimate,
        deadline: fields
            .deadline
            .as_deref()
            .map(to_shortcut_timestamp)
            .transpose()?,
        created_at: fields
            .created_at
            .as_deref()
            .map(to_shortcut_timestamp)
            .transpose()?,
        external_id: fields.external_id.clone(),
        external_links: fields
            .external_links
            .as_deref()
            .map(parse_string_list)
            .transpose()?,
        project_id: fields.project_id,
        epic_id: fields.epic_id,
        custom_fields,
        ..StoryPayload::default()
    })
}

/// Ids of the entities whose name is in `names`, in listing order.
pub fn resolve_ids(entities: &[NamedEntity], names: &[String]) -> Vec<ResourceId> {
    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    entities
        .iter()
        .filter(|entity| wanted.contains(entity.name.as_str()))
        .map(|entity| entity.id.clone())
        .collect()
}

fn non_empty(ids: Vec<ResourceId>) -> Option<Vec<ResourceId>> {
    if ids.is_empty() { None } else { Some(ids) }
}

fn parse_names(raw: Option<&str>) -> AppResult<Option<Vec<String>>> {
    raw.map(parse_string_list).transpose()
}

async fn resolve_label_ids(
    tracker: &dyn StoryTrackerService,
    names: &[String],
) -> AppResult<Vec<ResourceId>> {
    let labels = tracker.list_labels().await?;
    let ids = resolve_ids(&labels, names);
    if ids.len() < names.len() {
        warn!("Resolved {} of {} label names", ids.len(), names.len());
    }
    Ok(ids)
}

async fn resolve_member_ids(
    tracker: &dyn StoryTrackerService,
    names: &[String],
) -> AppResult<Vec<ResourceId>> {
    let members = tracker.list_members().await?;
    let ids = resolve_ids(&members, names);
    if ids.len() < names.len() {
        warn!("Resolved {} of {} member names", ids.len(), names.len());
    }
    Ok(ids)
}

async fn upload_attachments(
    tracker: &dyn StoryTrackerService,
    attachment: Option<&AttachmentSource>,
) -> AppResult<(Vec<ResourceId>, Vec<PathBuf>)> {
    let Some(attachment) = attachment else {
        return Ok((Vec::new(), Vec::new()));
    };

    let paths = attachment.resolve_paths()?;
    if paths.is_empty() {
        warn!("No files matched '{}'", attachment.file_name);
    }

    let mut file_ids = Vec::with_capacity(paths.len());
    for path in &paths {
        let file_id = tracker.upload_file(path).await?;
        println!("{} was successfully uploaded to Shortcut", path.display());
        info!("{} was uploaded as file {file_id}", path.display());
        file_ids.push(file_id);
    }
    Ok((file_ids, paths))
}

pub async fn create_story(
    ctx: &AppContext,
    request: CreateStoryRequest,
) -> AppResult<StoryWorkflowOutcome> {
    let tracker = ctx.story_tracker.as_ref();
    let mut payload = build_payload(&request.fields)?;
    let label_names = parse_names(request.labels.as_deref())?;
    let owner_names = parse_names(request.owners.as_deref())?;

    if let Some(names) = label_names {
        payload.label_ids = non_empty(resolve_label_ids(tracker, &names).await?);
    }
    if let Some(names) = owner_names {
        payload.owner_ids = non_empty(resolve_member_ids(tracker, &names).await?);
    }

    let (file_ids, uploaded) = upload_attachments(tracker, request.attachment.as_ref()).await?;
    payload.file_ids = non_empty(file_ids);

    let story = tracker.create_story(&payload).await?;
    let response_path = ctx.artifacts.write_response(&story)?;

    Ok(StoryWorkflowOutcome {
        story,
        uploaded,
        response_path,
    })
}

pub async fn update_story(
    ctx: &AppContext,
    request: UpdateStoryRequest,
) -> AppResult<StoryWorkflowOutcome> {
    let tracker = ctx.story_tracker.as_ref();
    let mut payload = build_payload(&request.fields)?;
    let follower_names = parse_names(request.followers.as_deref())?;

    if let Some(names) = follower_names {
        payload.follower_ids = non_empty(resolve_member_ids(tracker, &names).await?);
    }

    let (file_ids, uploaded) = upload_attachments(tracker, request.attachment.as_ref()).await?;
    payload.file_ids = non_empty(file_ids);

    let story = tracker
        .update_story(request.story_public_id, &payload)
        .await?;
    let response_path = ctx.artifacts.write_response(&story)?;

    Ok(StoryWorkflowOutcome {
        story,
        uploaded,
        response_path,
    })
}
