//! Page elements the controllers drive, passed in explicitly instead of
//! being looked up by id. Handles take `&self` so a host can share them
//! across tasks behind `Arc`.

pub mod render;
pub mod terminal;

pub use render::*;
pub use terminal::*;

use reqwest::Url;
use std::fmt;

use crate::types::Credential;

/// User-facing notifications (the browser's `alert`).
#[cfg_attr(test, mockall::automock)]
pub trait Alerts: Send + Sync {
    fn alert(&self, message: &str);
}

#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &Url);
}

/// Login form with its username and password inputs.
pub trait CredentialForm: Send + Sync {
    fn username(&self) -> String;
    fn password(&self) -> String;

    fn credential(&self) -> Credential {
        Credential::new(self.username(), self.password())
    }
}

pub trait StrategySelector: Send + Sync {
    fn append_option(&self, label: &str, value: &str);

    /// Current value; empty when the selector has no options.
    fn value(&self) -> String;
}

/// Body of the positions table.
pub trait PositionsTable: Send + Sync {
    fn replace_rows(&self, rows: Vec<TableRow>);
}

/// Clickable triggers on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Start,
    Stop,
    CloseAll,
}

impl Control {
    pub fn all() -> Vec<Control> {
        vec![Control::Start, Control::Stop, Control::CloseAll]
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Start => write!(f, "startButton"),
            Control::Stop => write!(f, "stopButton"),
            Control::CloseAll => write!(f, "closeAllPositionsButton"),
        }
    }
}
