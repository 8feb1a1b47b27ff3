use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "resume-form")]
#[command(about = "Sign in and submit your resume for generation")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,

        #[arg(long, env = "RESUME_FORM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Confirm an account with the emailed code
    Confirm {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: String,
    },

    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "RESUME_FORM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show who is signed in
    Status,

    /// Fill the resume form from a JSON draft and submit it
    Submit {
        /// Path to the draft file
        draft: PathBuf,
    },
}
