use std::path::PathBuf;

use clap::Subcommand;

mod presenter;

pub use presenter::TerminalPresenter;

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a wine by name, optionally attaching a label photo
    Lookup {
        /// Wine name; several words are joined with spaces
        wine_name: Vec<String>,

        /// Photo of the label (kept with the request, not uploaded)
        #[arg(short, long)]
        image: Option<PathBuf>,
    },

    /// Interactive session: one lookup per line, `:quit` to leave
    Shell,

    /// Print the prompt that would be sent, without calling the service
    Prompt {
        wine_name: Vec<String>,
    },

    /// Manage stored API keys
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Save an API key
    SetKey {
        key: String,

        /// Store it as the vision-service key instead of the chat key
        #[arg(long)]
        vision: bool,
    },

    /// Show stored keys, masked
    Show,

    /// Remove a stored key
    Clear {
        #[arg(long)]
        vision: bool,
    },
}

/// `None` when no words were given.
pub fn join_words(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}
