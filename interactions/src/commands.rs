//! Maintenance commands. Each returns the report printed by the binary.
use interactions_controller::{GateState, Settled, TargetView, ToggleError, ToggleOutcome};
use interactions_shared::types::{ActorId, TargetId, TargetKind};
use tracing::info;

use crate::cli::{Command, TargetArgs, ToggleArgs};
use crate::config::Dependencies;
use crate::errors::AppError;

pub async fn run(command: Command, deps: &Dependencies) -> Result<String, AppError> {
    match command {
        Command::Migrate => migrate(deps).await,
        Command::Profile { actor } => create_profile(deps, ActorId::new(actor)?).await,
        Command::Toggle(args) => toggle(deps, args).await,
        Command::Show(args) => show(deps, args).await,
        Command::Recount { target, kind } => recount(deps, TargetId::new(target)?, kind.into()).await,
    }
}

async fn migrate(deps: &Dependencies) -> Result<String, AppError> {
    deps.backend.migrate().await?;
    info!("Migrations applied");
    Ok("migrations applied".to_string())
}

async fn create_profile(deps: &Dependencies, actor: ActorId) -> Result<String, AppError> {
    deps.backend.profiles.create_profile(&actor).await?;
    Ok(format!("profile registered for {actor}"))
}

/// Connects the actor and loads the target, leaving the controller ready to
/// toggle it.
async fn open(deps: &Dependencies, args: &TargetArgs) -> Result<(TargetId, TargetView), AppError> {
    let actor = ActorId::new(&args.actor)?;
    let target = TargetId::new(&args.target)?;

    deps.controller.connect(actor);
    let view = deps.controller.load(&target, args.kind.into()).await?;
    Ok((target, view))
}

async fn toggle(deps: &Dependencies, args: ToggleArgs) -> Result<String, AppError> {
    let kind = args.toggle_kind();
    let (target, _) = open(deps, &args.target).await?;

    if let GateState::Checked { has_profile: false } = deps.controller.check_profile().await? {
        return Err(ToggleError::ProfileRequired.into());
    }

    match deps.controller.toggle(kind, &target)? {
        ToggleOutcome::Suppressed { view } => Ok(format!("already in flight: {}", describe(&view))),
        ToggleOutcome::Applied { settlement, .. } => match settlement.settled().await {
            Settled::Committed(view) => Ok(describe(&view)),
            Settled::RolledBack { error, .. } => Err(error.into()),
            Settled::Abandoned => Ok("abandoned".to_string()),
        },
    }
}

async fn show(deps: &Dependencies, args: TargetArgs) -> Result<String, AppError> {
    let (_, view) = open(deps, &args).await?;
    Ok(describe(&view))
}

async fn recount(deps: &Dependencies, target: TargetId, kind: TargetKind) -> Result<String, AppError> {
    let recount = deps.reconciler.recount(&target, kind).await?;
    Ok(format!(
        "{kind} {target}: likes {} -> {}, dislikes {} -> {}",
        recount.before.like_count,
        recount.after.like_count,
        recount.before.dislike_count,
        recount.after.dislike_count,
    ))
}

fn describe(view: &TargetView) -> String {
    format!(
        "{} {}: {:?} (likes {}, dislikes {})",
        view.target_kind,
        view.target_id,
        view.state(),
        view.like_count,
        view.dislike_count
    )
}
