use clap::{ArgAction, Args, Parser, Subcommand};

pub const AIOS_BEFORE_HELP: &str = concat!(
    "aios ",
    env!("CARGO_PKG_VERSION"),
    " – project workspace manager\n\n",
    "\x1b[1;36mProjects\x1b[0m\n",
    "  project          Track, untrack, inspect and list projects.\n\n",
    "\x1b[1;36mWorkspace\x1b[0m\n",
    "  workspace        Validate, plan and repair the project link tree.\n",
    "  watch            Poll paths for drift and optionally repair links.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "aios",
    author,
    version,
    disable_help_subcommand = true,
    before_help = AIOS_BEFORE_HELP
)]
#[allow(clippy::struct_excessive_bools)]
pub struct AiosCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(about = "Manage the tracked project inventory.")]
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    #[command(about = "Validate and repair the project link tree.")]
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommand,
    },
    #[command(
        about = "Watch paths for drift until interrupted.",
        override_usage = "aios watch <PATH>... [--interval-ms N] [--repair-links]"
    )]
    Watch(WatchArgs),
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    #[command(about = "Start tracking a project directory.")]
    Track(TrackArgs),
    #[command(about = "Stop tracking a project (by id or path).")]
    Untrack(SelectorArgs),
    #[command(about = "Show one tracked project (by id or path).")]
    Inspect(SelectorArgs),
    #[command(about = "List tracked projects in path order.")]
    List,
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    #[command(about = "Report the status of every project link.")]
    Validate,
    #[command(about = "Show the actions a repair would take.")]
    Plan,
    #[command(about = "Create and repair project links.")]
    Repair,
}

#[derive(Args, Debug)]
pub struct TrackArgs {
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(Args, Debug)]
pub struct SelectorArgs {
    #[arg(value_name = "ID_OR_PATH")]
    pub selector: String,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<String>,
    #[arg(
        long,
        value_name = "N",
        help = "Polling interval in milliseconds (defaults to AIOS_WATCH_INTERVAL_MS or 2000)"
    )]
    pub interval_ms: Option<u64>,
    #[arg(long, help = "Re-run workspace repair whenever drift is detected")]
    pub repair_links: bool,
}
