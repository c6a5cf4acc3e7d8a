use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use vinho::{LookupPresenter, LookupResult, LookupState};

const LOADING_MESSAGE: &str = "Carregando informações...";
const RESULT_HEADING: &str = "Informações do Vinho 👇";

/// Spinner on stderr while loading; result on stdout, alerts on stderr.
///
/// Output is produced once per lookup, when the state settles.
pub struct TerminalPresenter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupPresenter for TerminalPresenter {
    fn render(&self, state: &LookupState) {
        let mut spinner = self.spinner.lock().unwrap_or_else(|e| e.into_inner());

        if state.is_loading() {
            if spinner.is_none() {
                let bar = ProgressBar::new_spinner();
                bar.set_style(ProgressStyle::default_spinner());
                bar.set_message(LOADING_MESSAGE);
                bar.enable_steady_tick(Duration::from_millis(100));
                *spinner = Some(bar);
            }
            return;
        }

        if let Some(bar) = spinner.take() {
            bar.finish_and_clear();
        }

        match state.result() {
            Some(LookupResult::Success(text)) => {
                println!("{}\n", RESULT_HEADING);
                println!("{}", text);
            }
            Some(LookupResult::Failure(_)) => {
                if let Some(alert) = state.alert() {
                    eprintln!("{}: {}", alert.title, alert.message);
                }
            }
            Some(LookupResult::Pending) | None => {}
        }
    }
}
