use clap::Args;

use crate::cmd::shared::StoryArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::story::{CreateStoryRequest, StoryWorkflowOutcome, create_story};

#[derive(Args, Debug, Clone)]
pub struct CreateTicketArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub project_id: i64,
    /// Label names to apply, e.g. "['bug', 'urgent']".
    #[arg(long)]
    pub labels: Option<String>,
    /// Member names to set as owners.
    #[arg(long)]
    pub owners: Option<String>,
    #[command(flatten)]
    pub story: StoryArgs,
}

pub async fn run(ctx: &AppContext, args: CreateTicketArgs) -> AppResult<StoryWorkflowOutcome> {
    let (fields, attachment) = args.story.into_parts(
        Some(args.name),
        Some(args.description),
        Some(args.project_id),
    );
    create_story(
        ctx,
        CreateStoryRequest {
            fields,
            labels: args.labels,
            owners: args.owners,
            attachment,
        },
    )
    .await
}
