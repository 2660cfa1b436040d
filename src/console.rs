//! Terminal host for the controllers: builds the page elements, runs the
//! one-shot commands and the interactive loop.

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};
use tracing::{debug, info};

use crate::api::AccountApi;
use crate::controllers::{
    AccountDashboardController, DashboardPage, LoginController, LoginOutcome, LoginPage,
};
use crate::types::Symbol;
use crate::view::{
    Control, CredentialForm, FilledForm, PositionsTable, StrategySelector, TerminalAlerts,
    TerminalNavigator, TerminalSelector, TerminalTable,
};

const HELP: &str = "\
commands:
  strategies       list strategies (* = selected)
  positions        show the positions table
  refresh          reload positions
  select <name>    choose the strategy to start
  start            start the selected strategy
  stop             stop the running strategy
  close            close all positions
  alerts           show alerts raised so far
  help             show this help
  quit             leave the console";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Strategies,
    Positions,
    Refresh,
    Select(String),
    Start,
    Stop,
    Close,
    Alerts,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(None);
        };
        let rest = parts.collect::<Vec<_>>().join(" ");

        let command = match word.to_lowercase().as_str() {
            "strategies" | "s" => Command::Strategies,
            "positions" | "p" => Command::Positions,
            "refresh" | "r" => Command::Refresh,
            "select" if rest.is_empty() => return Err("usage: select <name>".to_string()),
            "select" => Command::Select(rest),
            "start" => Command::Start,
            "stop" => Command::Stop,
            "close" | "close-all" => Command::Close,
            "alerts" => Command::Alerts,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(Some(command))
    }
}

/// Terminal elements backing the account page.
pub struct DashboardView {
    pub alerts: Arc<TerminalAlerts>,
    pub selector: Arc<TerminalSelector>,
    pub table: Arc<TerminalTable>,
}

impl DashboardView {
    pub fn new(alerts: Arc<TerminalAlerts>) -> Self {
        Self {
            alerts,
            selector: Arc::new(TerminalSelector::new()),
            table: Arc::new(TerminalTable::new()),
        }
    }

    pub fn page(&self) -> DashboardPage {
        DashboardPage {
            alerts: self.alerts.clone(),
            selector: Some(self.selector.clone() as Arc<dyn StrategySelector>),
            table: Some(self.table.clone() as Arc<dyn PositionsTable>),
            controls: Control::all(),
        }
    }

    pub fn controller(&self, api: Arc<dyn AccountApi>, symbol: Symbol) -> AccountDashboardController {
        AccountDashboardController::new(api, self.page(), symbol)
    }

    pub fn render(&self, symbol: &Symbol) -> String {
        format!(
            "Strategies:\n{}\n\nPositions ({}):\n{}",
            self.selector.render(),
            symbol,
            self.table.render()
        )
    }
}

/// Submits the login form once with the given values.
pub async fn login(
    api: Arc<dyn AccountApi>,
    alerts: Arc<TerminalAlerts>,
    navigator: Arc<TerminalNavigator>,
    username: &str,
    password: &str,
) -> LoginOutcome {
    let form: Arc<dyn CredentialForm> = Arc::new(FilledForm::new(username, password));
    let page = LoginPage {
        form: Some(form),
        alerts,
        navigator,
    };

    match LoginController::initialize(api, page) {
        Some(controller) => controller.submit().await,
        None => LoginOutcome::Failed,
    }
}

/// Reads commands until `quit` or end of input. Each command runs to
/// completion before the next line is read.
pub async fn run<R>(controller: &AccountDashboardController, view: &DashboardView, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut stdout = tokio::io::stdout();
    let mut lines = input.lines();

    println!("{}", view.render(controller.symbol()));
    println!("type 'help' for commands");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{}", usage);
                continue;
            }
        };
        debug!("Console command: {:?}", command);

        if !execute(controller, view, command).await {
            break;
        }
    }

    info!("Console closed");
    Ok(())
}

/// Runs one command. Returns false when the console should stop.
pub async fn execute(controller: &AccountDashboardController, view: &DashboardView, command: Command) -> bool {
    match command {
        Command::Strategies => println!("{}", view.selector.render()),
        Command::Positions => println!("{}", view.table.render()),
        Command::Refresh => {
            controller.refresh_positions().await;
            println!("{}", view.table.render());
        }
        Command::Select(name) => {
            if !view.selector.select(&name) {
                println!("no strategy named '{}'", name);
            }
        }
        Command::Start => controller.click(Control::Start).await,
        Command::Stop => controller.click(Control::Stop).await,
        Command::Close => controller.click(Control::CloseAll).await,
        Command::Alerts => {
            for alert in view.alerts.history() {
                println!("{}", alert);
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}
