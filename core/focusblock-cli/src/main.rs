//! focusblock: block distracting sites for the length of a focus session.
//!
//! ## Subcommands
//!
//! - `start`: install the host block, wait out the session, clean up, and
//!   capture the recap
//! - `collect`: merge a range of recap notes into one day note
//! - `status`: report session and block state, flagging divergence

mod commands;
mod logging;
mod signal;
mod stdin_prompt;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "focusblock")]
#[command(about = "Block distracting websites during focus sessions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a focus session that blocks sites in the hosts file
    Start {
        /// Comma-separated site names to block (e.g. "x,reddit")
        #[arg(long, value_name = "SITES")]
        sites: Option<String>,

        /// Block every site listed in default_sites.txt instead
        #[arg(long, conflicts_with = "sites")]
        all_sites: bool,

        /// Session length in minutes
        #[arg(long, value_name = "MINUTES")]
        minutes: Option<u64>,

        /// Run until interrupted instead of for a fixed duration
        #[arg(long, conflicts_with = "minutes")]
        continuous: bool,

        /// Divider glyph for recap answers (one of: •  >  -)
        #[arg(long, value_name = "GLYPH")]
        divider: Option<String>,
    },

    /// Merge a range of session recap notes into one day note
    Collect {
        /// First session number of the inclusive range
        #[arg(long, value_name = "N")]
        from: u32,

        /// Last session number of the inclusive range
        #[arg(long, value_name = "N")]
        to: u32,

        /// Divider glyph for the merged answers (one of: •  >  -)
        #[arg(long, value_name = "GLYPH")]
        divider: Option<String>,
    },

    /// Show session and host-block state
    Status,
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Start {
            sites,
            all_sites,
            minutes,
            continuous,
            divider,
        } => commands::start::run(commands::start::StartArgs {
            sites,
            all_sites,
            minutes,
            continuous,
            divider,
        }),
        Commands::Collect { from, to, divider } => commands::collect::run(from, to, divider),
        Commands::Status => commands::status::run(),
    };

    std::process::exit(exit_code);
}
