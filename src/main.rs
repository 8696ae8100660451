use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use git_ship::build::ProcessBuildTool;
use git_ship::cli::orchestration::{
    self, BuildWorkflowArgs, StatusWorkflowArgs, SyncWorkflowArgs,
};
use git_ship::config;
use git_ship::git::Git2Repository;
use git_ship::launcher::SystemLauncher;
use git_ship::{telemetry, ui};

#[derive(clap::Parser)]
#[command(
    name = "git-ship",
    version,
    about = "Build a project, push it to GitHub and open its CI status page"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Log each step to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the build entry point and open the artifact location on success
    Build {
        #[arg(long, default_value = ".", help = "Project directory")]
        dir: PathBuf,

        #[arg(long, help = "Do not open the artifact location")]
        no_open: bool,
    },

    /// Stage everything, commit and force push to the derived GitHub remote
    Sync {
        #[arg(short, long, help = "GitHub username (prompted for when omitted)")]
        username: Option<String>,

        #[arg(short, long, help = "Commit message")]
        message: Option<String>,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Open the CI status page in the default browser
    Status {
        #[arg(short, long, help = "GitHub username (prompted for when omitted)")]
        username: Option<String>,

        #[arg(long, help = "Print the URL instead of opening it")]
        print_only: bool,
    },

    /// Print the resolved configuration
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(orchestration::EXIT_FAILURE);
        }
    };

    let code = match args.command {
        Command::Build { dir, no_open } => orchestration::run_build_workflow(
            &BuildWorkflowArgs {
                dir,
                open: !no_open,
            },
            &config,
            &ProcessBuildTool,
            &SystemLauncher,
        )?,
        Command::Sync {
            username,
            message,
            dry_run,
        } => orchestration::run_sync_workflow(
            &SyncWorkflowArgs {
                dir: PathBuf::from("."),
                username,
                message,
                dry_run,
            },
            &config,
            |root: &Path| Git2Repository::open(root),
            ui::prompt_username,
        )?,
        Command::Status {
            username,
            print_only,
        } => orchestration::run_status_workflow(
            &StatusWorkflowArgs {
                dir: PathBuf::from("."),
                username,
                print_only,
            },
            &config,
            &SystemLauncher,
            ui::prompt_username,
        )?,
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            0
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
