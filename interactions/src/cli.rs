//! Command line interface of the interactions binary.
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use interactions_shared::types::{TargetKind, ToggleKind};

#[derive(Debug, Parser)]
#[command(name = "interactions", version, about = "Like/dislike maintenance commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply the database migrations.
    Migrate,
    /// Register a profile so the actor may vote.
    Profile {
        #[arg(long)]
        actor: String,
    },
    /// Toggle a like or dislike and wait for it to settle.
    Toggle(ToggleArgs),
    /// Print an actor's vote and the counters of a target.
    Show(TargetArgs),
    /// Recompute a target's counters from its vote records.
    Recount {
        #[arg(long)]
        target: String,
        #[arg(long, value_enum, default_value_t = KindArg::Listing)]
        kind: KindArg,
    },
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    #[arg(long)]
    pub actor: String,
    #[arg(long)]
    pub target: String,
    #[arg(long, value_enum, default_value_t = KindArg::Listing)]
    pub kind: KindArg,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("vote").required(true).args(["like", "dislike"])))]
pub struct ToggleArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    #[arg(long)]
    pub like: bool,
    #[arg(long)]
    pub dislike: bool,
}

impl ToggleArgs {
    pub fn toggle_kind(&self) -> ToggleKind {
        if self.like { ToggleKind::Like } else { ToggleKind::Dislike }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Listing,
    Comment,
}

impl From<KindArg> for TargetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Listing => TargetKind::Listing,
            KindArg::Comment => TargetKind::Comment,
        }
    }
}
