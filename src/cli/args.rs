use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "mindful")]
#[command(about = "Guided breathing exercises and a private journal in your terminal")]
#[command(long_about = "mindful - breathing exercises and journaling

Run guided breathing techniques with a live countdown, keep a history of
every session, and write short journal entries.

QUICK START:
  mindful techniques        List available techniques
  mindful breathe 478       Start a 4-7-8 breathing exercise
  mindful history           Show recent sessions
  mindful journal add \"Evening\" \"Felt calmer after box breathing\"

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to the `general.default_output` setting.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log engine and storage activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List breathing techniques
    ///
    /// Shows every technique in the catalog: built-in ones plus any
    /// defined under `techniques:` in the config file.
    #[command(alias = "t")]
    Techniques,

    /// Run a guided breathing exercise
    ///
    /// Opens a full-screen view with the current phase and countdown.
    ///
    /// # Keys
    ///
    ///   space/enter   Start (or restart) the exercise
    ///   s             Stop early and save a partial session
    ///   r             Reset
    ///   q/esc         Quit (a running exercise is saved as partial)
    ///
    /// # Examples
    ///
    ///   mindful breathe           Use the default technique
    ///   mindful breathe box       Box breathing
    #[command(alias = "b")]
    Breathe {
        /// Technique id (see `mindful techniques`)
        technique: Option<String>,
    },

    /// Run an exercise headlessly and record the result
    ///
    /// Ticks the session runner on a simulated clock without waiting in
    /// real time. With `--seconds`, the run is stopped after that many
    /// seconds if it has not finished.
    Simulate {
        /// Technique id
        technique: Option<String>,

        /// Seconds to run before stopping (default: the whole exercise)
        #[arg(long, short = 's')]
        seconds: Option<u32>,
    },

    /// View session history
    #[command(alias = "h")]
    History {
        /// Number of sessions to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,

        /// Only sessions of this technique
        #[arg(long, short = 't')]
        technique: Option<String>,
    },

    /// Summarize breathing practice
    Report {
        /// Period: today, week, month, all
        #[arg(default_value = "week")]
        period: String,
    },

    /// Delete all of your session history
    Clear {
        /// Confirm deletion
        #[arg(long)]
        force: bool,
    },

    /// Write and read journal entries
    #[command(alias = "j")]
    Journal(JournalArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for journaling.
#[derive(Args)]
pub struct JournalArgs {
    #[command(subcommand)]
    pub command: JournalCommands,
}

/// Journal subcommands.
#[derive(Subcommand)]
pub enum JournalCommands {
    /// Add an entry
    Add {
        /// Entry title
        title: String,

        /// Entry text
        content: String,

        /// Mood: great, good, okay, low, bad
        #[arg(long, short = 'm')]
        mood: Option<String>,
    },

    /// List recent entries
    List {
        /// Number of entries to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,
    },

    /// Show one entry
    Show {
        /// Entry ID
        id: i64,
    },

    /// Edit an entry
    Edit {
        /// Entry ID
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New text
        #[arg(long)]
        content: Option<String>,

        /// New mood
        #[arg(long, short = 'm')]
        mood: Option<String>,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: i64,
    },
}

/// Arguments for configuration.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
