use briefly::model::{SubscriptionTier, SummaryLength, SummaryStyle};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "briefly", bin_name = "briefly", version = get_version())]
#[command(about = "Summarize documents and keep notes from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log requests and state changes to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// Form fields default to empty so that missing input is reported by the
// form validators, the same way an untouched input box would be.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Register {
        #[arg(short, long, default_value = "")]
        username: String,
        #[arg(short, long, default_value = "")]
        email: String,
        #[arg(short, long, default_value = "")]
        password: String,
        /// Repeat the password
        #[arg(short, long, default_value = "")]
        confirm: String,
    },

    /// Sign in and store the session
    Login {
        #[arg(short, long, default_value = "")]
        username: String,
        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Exchange the session token for a fresh one
    Refresh,

    /// Ask for a password reset link
    ForgotPassword {
        #[arg(short, long, default_value = "")]
        email: String,
    },

    /// Set a new password with the token from the reset link
    ResetPassword {
        #[arg(short, long, default_value = "")]
        token: String,
        #[arg(short, long, default_value = "")]
        password: String,
        #[arg(short, long, default_value = "")]
        confirm: String,
    },

    /// Show the session and available screens
    Status {
        /// Keep running and print every session change
        #[arg(short, long)]
        watch: bool,
    },

    /// List or add notes
    Notes {
        #[command(subcommand)]
        action: Option<NotesAction>,
    },

    /// Browse generated summaries
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Upload a PDF and print its summary
    Summarize {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = SummaryLength::Short)]
        length: SummaryLength,
        #[arg(short, long, value_enum, default_value_t = SummaryStyle::Regular)]
        style: SummaryStyle,
    },

    /// Site analytics (admins only)
    Admin,

    /// Switch to a paid plan
    Subscribe {
        #[arg(value_enum)]
        tier: SubscriptionTier,
    },

    /// Show or set configuration (base-url, password-policy, poll-interval)
    Config {
        key: Option<String>,
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotesAction {
    /// List notes, optionally by content length
    List {
        /// Minimum length in characters
        #[arg(long, default_value = "")]
        min: String,
        /// Maximum length in characters
        #[arg(long, default_value = "")]
        max: String,
    },

    /// Add a note
    Add {
        #[arg(num_args = 0..)]
        text: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List generated summaries
    List,

    /// Print one summary
    View { id: i64 },

    /// Save one summary as summary_<id>.txt
    Download {
        id: i64,
        /// Target directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}
