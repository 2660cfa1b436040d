use chrono::Local;
use reqwest::Url;
use std::sync::Mutex;
use tracing::info;

use super::{format_table, Alerts, CredentialForm, Navigator, PositionsTable, StrategySelector, TableRow};

/// Prints alerts to stdout and keeps them for later inspection.
#[derive(Debug, Default)]
pub struct TerminalAlerts {
    history: Mutex<Vec<String>>,
    quiet: bool,
}

impl TerminalAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records without printing.
    #[cfg(test)]
    pub fn quiet() -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            quiet: true,
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Alerts for TerminalAlerts {
    fn alert(&self, message: &str) {
        if !self.quiet {
            println!("[{}] {}", Local::now().format("%H:%M:%S"), message);
        }
        if let Ok(mut history) = self.history.lock() {
            history.push(message.to_string());
        }
    }
}

/// Tracks the location the page was sent to.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    location: Mutex<Option<Url>>,
}

impl TerminalNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> Option<Url> {
        self.location.lock().ok().and_then(|l| l.clone())
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, url: &Url) {
        info!("Navigating to {}", url);
        if let Ok(mut location) = self.location.lock() {
            *location = Some(url.clone());
        }
    }
}

/// Login form filled from command-line input.
#[derive(Debug, Clone, Default)]
pub struct FilledForm {
    username: String,
    password: String,
}

impl FilledForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialForm for FilledForm {
    fn username(&self) -> String {
        self.username.clone()
    }

    fn password(&self) -> String {
        self.password.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Default)]
struct SelectorState {
    options: Vec<SelectOption>,
    selected: Option<usize>,
}

/// Option list with a current selection. Without an explicit selection the
/// first option is current.
#[derive(Debug, Default)]
pub struct TerminalSelector {
    state: Mutex<SelectorState>,
}

impl TerminalSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> Vec<SelectOption> {
        self.state.lock().map(|s| s.options.clone()).unwrap_or_default()
    }

    /// Selects the first option whose value matches. Returns false when
    /// there is no such option.
    pub fn select(&self, value: &str) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        let index = state.options.iter().position(|o| o.value == value);
        match index {
            Some(index) => {
                state.selected = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn render(&self) -> String {
        let current = self.value();
        let options = self.options();
        if options.is_empty() {
            return "(no strategies)".to_string();
        }
        options
            .iter()
            .map(|o| {
                let marker = if o.value == current { '*' } else { ' ' };
                format!("{} {}", marker, o.label)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl StrategySelector for TerminalSelector {
    fn append_option(&self, label: &str, value: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.options.push(SelectOption {
                label: label.to_string(),
                value: value.to_string(),
            });
        }
    }

    fn value(&self) -> String {
        let Ok(state) = self.state.lock() else {
            return String::new();
        };
        state
            .options
            .get(state.selected.unwrap_or(0))
            .map(|o| o.value.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct TerminalTable {
    rows: Mutex<Vec<TableRow>>,
}

impl TerminalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<TableRow> {
        self.rows.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn render(&self) -> String {
        format_table(&self.rows())
    }
}

impl PositionsTable for TerminalTable {
    fn replace_rows(&self, rows: Vec<TableRow>) {
        if let Ok(mut current) = self.rows.lock() {
            *current = rows;
        }
    }
}
