use clap::Args;

use crate::cmd::shared::StoryArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::story::{StoryWorkflowOutcome, UpdateStoryRequest, update_story};

#[derive(Args, Debug, Clone)]
pub struct UpdateTicketArgs {
    #[arg(long)]
    pub story_public_id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub project_id: Option<i64>,
    /// Member names to add as followers, e.g. "['Ada Lovelace']".
    #[arg(long)]
    pub followers: Option<String>,
    #[command(flatten)]
    pub story: StoryArgs,
}

pub async fn run(ctx: &AppContext, args: UpdateTicketArgs) -> AppResult<StoryWorkflowOutcome> {
    let (fields, attachment) = args
        .story
        .into_parts(args.name, args.description, args.project_id);
    update_story(
        ctx,
        UpdateStoryRequest {
            story_public_id: args.story_public_id,
            fields,
            followers: args.followers,
            attachment,
        },
    )
    .await
}
