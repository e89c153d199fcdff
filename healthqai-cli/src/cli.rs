use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "healthqai", version, about = "AI-Powered Healthcare Assistant")]
pub struct Cli {
    /// Base URL of the HealthQAI service [default: $HEALTHQAI_API_URL or http://localhost:8000]
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// File holding the session token [default: $HEALTHQAI_SESSION_FILE or ~/.healthqai/session.json]
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether the backend is reachable
    Status,
    /// Submit symptoms for a diagnosis
    Diagnose {
        #[arg(long)]
        age: String,
        /// One of: Male, Female, Other, "Prefer not to say"
        #[arg(long)]
        gender: String,
        /// At least 10 characters: duration and severity help
        #[arg(long)]
        symptoms: String,
        /// Relevant medical history or conditions
        #[arg(long, default_value = "")]
        history: String,
    },
    /// Sign in (defaults to the demo account)
    Login {
        #[arg(long, default_value = "doctor")]
        username: String,
        #[arg(long, default_value = "doctor123")]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Ask a health question (requires login)
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Show the current session
    Whoami,
}
