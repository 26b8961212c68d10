//! Command-line front end for the poll service.
//!
//! Each invocation behaves like one page visit: the stored session is read,
//! the requested view is checked by the route guard, and the command runs
//! against the backend configured through `POLLING_*` environment variables.

mod commands;
mod edit_args;
mod render;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use polling_app::AppContext;
use polling_errors::AppError;
use tracing_subscriber::EnvFilter;

use edit_args::OptionRename;

#[derive(Parser, Debug)]
#[command(name = "polling", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print listings as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Register an account and sign in with it.
    Signup(AccountArgs),

    /// Forget the stored session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// List the roles an account can have.
    Roles,

    /// List polls, loading pages up to `--pages`.
    Polls {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show one poll with its options.
    Poll { poll_id: i64 },

    /// Vote for an option of a poll.
    Vote { poll_id: i64, option_id: i64 },

    /// Show fresh vote counts for a poll.
    Results { poll_id: i64 },

    /// Create a poll (administrators only).
    AddPoll {
        #[arg(long)]
        title: String,
        /// Option title; repeat for each option.
        #[arg(long = "option", required = true)]
        options: Vec<String>,
    },

    /// Edit a poll (administrators only).
    EditPoll {
        poll_id: i64,
        #[arg(long)]
        title: Option<String>,
        /// Rename the option at a position, as `INDEX=TITLE`.
        #[arg(long = "rename")]
        renames: Vec<OptionRename>,
        /// Remove the option at a position.
        #[arg(long = "remove")]
        removals: Vec<usize>,
        /// Add a new option.
        #[arg(long = "add")]
        additions: Vec<String>,
    },

    /// Delete a poll (administrators only).
    DeletePoll { poll_id: i64 },

    /// List users (administrators only).
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },

    /// Create a user (administrators only).
    CreateUser(AccountArgs),

    /// Show where the guard sends a path for the current session.
    Route { path: String },
}

#[derive(Args, Debug)]
struct AccountArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Defaults to the password.
    #[arg(long)]
    confirm_password: Option<String>,
    /// Role id, see `polling roles`.
    #[arg(long)]
    role: i64,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = match AppContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {}", e.user_message());
            return ExitCode::from(2);
        }
    };

    match commands::run(&ctx, cli.command, cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let commands::CliError::App(AppError::EditInconsistent(steps)) = &e {
                for step in steps {
                    eprintln!("  not undone: {step}");
                }
            }
            ExitCode::from(1)
        }
    }
}
