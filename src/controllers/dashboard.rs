use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::failure_text;
use crate::api::{AccountApi, ApiError};
use crate::types::{Position, Symbol};
use crate::view::{no_positions_row, position_rows, Alerts, Control, PositionsTable, StrategySelector};

/// Elements of the account page. Missing elements disable their feature.
pub struct DashboardPage {
    pub alerts: Arc<dyn Alerts>,
    pub selector: Option<Arc<dyn StrategySelector>>,
    pub table: Option<Arc<dyn PositionsTable>>,
    pub controls: Vec<Control>,
}

pub struct AccountDashboardController {
    api: Arc<dyn AccountApi>,
    alerts: Arc<dyn Alerts>,
    selector: Option<Arc<dyn StrategySelector>>,
    table: Option<Arc<dyn PositionsTable>>,
    controls: HashSet<Control>,
    symbol: Symbol,
}

impl AccountDashboardController {
    pub fn new(api: Arc<dyn AccountApi>, page: DashboardPage, symbol: Symbol) -> Self {
        if page.selector.is_none() {
            error!("strategySelector not found on the page; strategy list disabled");
        }
        if page.table.is_none() {
            error!("positions-table-body not found on the page; positions disabled");
        }
        let controls: HashSet<Control> = page.controls.into_iter().collect();
        for control in Control::all() {
            if !controls.contains(&control) {
                error!("{} not found on the page; control disabled", control);
            }
        }

        Self {
            api,
            alerts: page.alerts,
            selector: page.selector,
            table: page.table,
            controls,
            symbol,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Page-load entry point: loads strategies and positions concurrently.
    pub async fn initialize(&self) {
        info!("Loading account dashboard for {}", self.symbol);
        tokio::join!(self.fetch_strategies(), self.fetch_positions(&self.symbol));
    }

    /// Appends every strategy to the selector. Failures are logged only.
    pub async fn fetch_strategies(&self) {
        let Some(selector) = &self.selector else {
            return;
        };

        match self.api.strategies().await {
            Ok(strategies) => {
                info!("Received {} strategies", strategies.len());
                for strategy in &strategies {
                    selector.append_option(&strategy.name, &strategy.name);
                }
            }
            Err(e) => {
                if let Some(detail) = e.server_message() {
                    debug!("Strategies request rejected: {}", detail);
                }
                error!("Error fetching strategies: {}", e);
            }
        }
    }

    /// Replaces the table with the current positions for `symbol`. On any
    /// failure the previous rows stay.
    pub async fn fetch_positions(&self, symbol: &Symbol) {
        let Some(table) = &self.table else {
            return;
        };

        match self.api.positions(symbol).await {
            Ok(positions) if positions.is_empty() => {
                table.replace_rows(vec![no_positions_row()]);
            }
            Ok(positions) => self.update_positions_table(&positions),
            Err(ApiError::UnexpectedShape(body)) => {
                error!("Unexpected data structure: {}", body);
            }
            Err(e) => error!("Error fetching positions: {}", e),
        }
    }

    pub async fn refresh_positions(&self) {
        self.fetch_positions(&self.symbol).await;
    }

    /// One row per position, in the order given.
    pub fn update_positions_table(&self, positions: &[Position]) {
        if let Some(table) = &self.table {
            table.replace_rows(position_rows(positions));
        }
    }

    pub async fn start_strategy(&self, name: &str) {
        match self.api.start_strategy(name).await {
            Ok(()) => {
                info!("Started strategy {}", name);
                self.alerts.alert("Strategy started successfully");
            }
            Err(e) => {
                log_rejection("start_strategy", &e);
                self.alerts.alert(&format!(
                    "Error starting strategy: {}",
                    failure_text(&e, "Failed to start strategy")
                ));
            }
        }
    }

    pub async fn stop_strategy(&self) {
        match self.api.stop_strategy().await {
            Ok(()) => {
                info!("Stopped strategy");
                self.alerts.alert("Strategy stopped successfully");
            }
            Err(e) => {
                log_rejection("stop_strategy", &e);
                self.alerts.alert(&format!(
                    "Error stopping strategy: {}",
                    failure_text(&e, "Failed to stop strategy")
                ));
            }
        }
    }

    pub async fn close_all_positions(&self) {
        match self.api.close_positions(&self.symbol).await {
            Ok(reply) => {
                let message = reply.message.unwrap_or_else(|| "Positions closed".to_string());
                info!("Close positions for {}: {}", self.symbol, message);
                self.alerts.alert(&message);
            }
            Err(e) => {
                log_rejection("close_positions", &e);
                self.alerts.alert(&format!(
                    "Error closing positions: {}",
                    failure_text(&e, "Failed to close positions")
                ));
            }
        }
    }

    /// Click handler for the dashboard controls. Clicks on controls the
    /// page does not have are ignored.
    pub async fn click(&self, control: Control) {
        if !self.controls.contains(&control) {
            warn!("Ignoring click on missing control {}", control);
            return;
        }

        match control {
            Control::Start => {
                let Some(selector) = &self.selector else {
                    error!("Cannot start strategy: strategySelector not found");
                    return;
                };
                let name = selector.value();
                self.start_strategy(&name).await;
            }
            Control::Stop => self.stop_strategy().await,
            Control::CloseAll => self.close_all_positions().await,
        }
    }
}

fn log_rejection(action: &str, err: &ApiError) {
    match err.server_message() {
        Some(detail) => debug!("{} failed: {} ({})", action, err, detail),
        None => debug!("{} failed: {}", action, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockAccountApi;
    use crate::types::{ServerMessage, Strategy};
    use crate::view::{MockAlerts, TableRow, TerminalAlerts, TerminalSelector, TerminalTable};
    use reqwest::StatusCode;
    use serde_json::json;

    struct Fixture {
        alerts: Arc<TerminalAlerts>,
        selector: Arc<TerminalSelector>,
        table: Arc<TerminalTable>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                alerts: Arc::new(TerminalAlerts::quiet()),
                selector: Arc::new(TerminalSelector::new()),
                table: Arc::new(TerminalTable::new()),
            }
        }

        fn controller(&self, api: MockAccountApi) -> AccountDashboardController {
            AccountDashboardController::new(
                Arc::new(api),
                DashboardPage {
                    alerts: self.alerts.clone(),
                    selector: Some(self.selector.clone() as Arc<dyn StrategySelector>),
                    table: Some(self.table.clone() as Arc<dyn PositionsTable>),
                    controls: Control::all(),
                },
                Symbol::default(),
            )
        }
    }

    fn strategies(names: &[&str]) -> Vec<Strategy> {
        names.iter().map(|n| Strategy { name: n.to_string() }).collect()
    }

    #[tokio::test]
    async fn test_strategies_are_appended_after_existing_options() {
        let mut api = MockAccountApi::new();
        api.expect_strategies()
            .times(1)
            .returning(|| Ok(strategies(&["A", "B"])));

        let fixture = Fixture::new();
        fixture.selector.append_option("-- choose --", "");
        fixture.controller(api).fetch_strategies().await;

        let options = fixture.selector.options();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label, "-- choose --");
        assert_eq!((options[1].label.as_str(), options[1].value.as_str()), ("A", "A"));
        assert_eq!((options[2].label.as_str(), options[2].value.as_str()), ("B", "B"));
    }

    #[tokio::test]
    async fn test_strategies_failure_is_silent() {
        let mut api = MockAccountApi::new();
        api.expect_strategies()
            .times(1)
            .returning(|| Err(ApiError::status(StatusCode::INTERNAL_SERVER_ERROR, None)));

        let fixture = Fixture::new();
        fixture.selector.append_option("keep", "keep");
        fixture.controller(api).fetch_strategies().await;

        assert_eq!(fixture.selector.options().len(), 1);
        assert!(fixture.alerts.history().is_empty());
    }

    #[tokio::test]
    async fn test_empty_positions_render_notice_row() {
        let mut api = MockAccountApi::new();
        api.expect_positions().times(1).returning(|_| Ok(vec![]));

        let fixture = Fixture::new();
        fixture.controller(api).refresh_positions().await;

        assert_eq!(fixture.table.rows(), vec![TableRow::Notice("No open positions".into())]);
    }

    #[tokio::test]
    async fn test_positions_render_in_order_with_placeholders() {
        let mut api = MockAccountApi::new();
        api.expect_positions()
            .withf(|symbol| symbol.as_str() == "BTCUSDT")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    Position::from_entry(json!({"id": "p1", "symbol": "BTCUSDT", "size": "0.1"})),
                    Position::from_entry(json!({"id": "p2", "side": "Sell", "leverage": 5})),
                ])
            });

        let fixture = Fixture::new();
        fixture.controller(api).refresh_positions().await;

        let rows = fixture.table.rows();
        assert_eq!(rows.len(), 2);
        match (&rows[0], &rows[1]) {
            (TableRow::Cells(first), TableRow::Cells(second)) => {
                assert_eq!(first[0], "p1");
                assert_eq!(first[1], "BTCUSDT");
                assert_eq!(first[3], "N/A");
                assert_eq!(second[0], "p2");
                assert_eq!(second[1], "N/A");
                assert_eq!(second[3], "5");
                assert_eq!(second[6], "Sell");
            }
            other => panic!("expected two position rows, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unexpected_shape_keeps_previous_rows() {
        let mut api = MockAccountApi::new();
        api.expect_positions()
            .times(1)
            .returning(|_| Err(ApiError::UnexpectedShape(r#"{"error":"boom"}"#.into())));

        let fixture = Fixture::new();
        let previous = vec![TableRow::Cells(vec!["old".into()])];
        fixture.table.replace_rows(previous.clone());
        fixture.controller(api).refresh_positions().await;

        assert_eq!(fixture.table.rows(), previous);
        assert!(fixture.alerts.history().is_empty());
    }

    fn decode_error() -> ApiError {
        ApiError::Decode(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err())
    }

    #[tokio::test]
    async fn test_failed_positions_fetch_keeps_previous_rows() {
        let mut api = MockAccountApi::new();
        api.expect_positions().times(1).returning(|_| Err(decode_error()));

        let fixture = Fixture::new();
        let previous = vec![TableRow::Notice("No open positions".into())];
        fixture.table.replace_rows(previous.clone());
        fixture.controller(api).refresh_positions().await;

        assert_eq!(fixture.table.rows(), previous);
        assert!(fixture.alerts.history().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_loads_both_lists() {
        let mut api = MockAccountApi::new();
        api.expect_strategies().times(1).returning(|| Ok(strategies(&["A"])));
        api.expect_positions().times(1).returning(|_| Ok(vec![]));

        let fixture = Fixture::new();
        fixture.controller(api).initialize().await;

        assert_eq!(fixture.selector.value(), "A");
        assert_eq!(fixture.table.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_start_click_uses_selected_strategy() {
        let mut api = MockAccountApi::new();
        api.expect_start_strategy()
            .withf(|name| name == "B")
            .times(1)
            .returning(|_| Ok(()));

        let fixture = Fixture::new();
        fixture.selector.append_option("A", "A");
        fixture.selector.append_option("B", "B");
        fixture.selector.select("B");
        fixture.controller(api).click(Control::Start).await;

        assert_eq!(fixture.alerts.history(), vec!["Strategy started successfully".to_string()]);
    }

    #[tokio::test]
    async fn test_start_failure_alert() {
        let mut api = MockAccountApi::new();
        api.expect_start_strategy().times(1).returning(|_| {
            Err(ApiError::status(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some("404 Not Found: Strategy not found".into()),
            ))
        });

        let fixture = Fixture::new();
        fixture.controller(api).start_strategy("missing").await;

        assert_eq!(
            fixture.alerts.history(),
            vec!["Error starting strategy: Failed to start strategy".to_string()]
        );
    }

    #[tokio::test]
    async fn test_stop_click_issues_one_request_each_time() {
        let mut api = MockAccountApi::new();
        api.expect_stop_strategy().times(2).returning(|| Ok(()));

        let fixture = Fixture::new();
        let controller = fixture.controller(api);
        controller.click(Control::Stop).await;
        controller.click(Control::Stop).await;

        assert_eq!(fixture.alerts.history().len(), 2);
        assert_eq!(fixture.alerts.history()[0], "Strategy stopped successfully");
    }

    #[tokio::test]
    async fn test_stop_failure_alert() {
        let mut api = MockAccountApi::new();
        api.expect_stop_strategy().times(1).returning(|| {
            Err(ApiError::status(
                StatusCode::BAD_REQUEST,
                Some("No strategy is currently running".into()),
            ))
        });

        let fixture = Fixture::new();
        fixture.controller(api).stop_strategy().await;

        assert_eq!(
            fixture.alerts.history(),
            vec!["Error stopping strategy: Failed to stop strategy".to_string()]
        );
    }

    #[tokio::test]
    async fn test_close_all_alerts_server_message() {
        let mut api = MockAccountApi::new();
        api.expect_close_positions()
            .withf(|symbol| symbol.as_str() == "BTCUSDT")
            .times(1)
            .returning(|_| {
                Ok(ServerMessage {
                    message: Some("All positions closed successfully".into()),
                    error: None,
                })
            });

        let fixture = Fixture::new();
        fixture.controller(api).click(Control::CloseAll).await;

        assert_eq!(
            fixture.alerts.history(),
            vec!["All positions closed successfully".to_string()]
        );
    }

    #[tokio::test]
    async fn test_close_all_failure_alert() {
        let mut api = MockAccountApi::new();
        api.expect_close_positions()
            .times(1)
            .returning(|_| Err(ApiError::status(StatusCode::BAD_REQUEST, None)));

        let mut alerts = MockAlerts::new();
        alerts
            .expect_alert()
            .withf(|m| m == "Error closing positions: Failed to close positions")
            .times(1)
            .return_const(());

        let controller = AccountDashboardController::new(
            Arc::new(api),
            DashboardPage {
                alerts: Arc::new(alerts),
                selector: None,
                table: None,
                controls: vec![Control::CloseAll],
            },
            Symbol::default(),
        );
        controller.click(Control::CloseAll).await;
    }

    #[tokio::test]
    async fn test_non_status_failures_show_the_error() {
        let detail = decode_error().to_string();

        let mut api = MockAccountApi::new();
        api.expect_start_strategy().times(1).returning(|_| Err(decode_error()));
        api.expect_stop_strategy().times(1).returning(|| Err(decode_error()));
        api.expect_close_positions().times(1).returning(|_| Err(decode_error()));

        let fixture = Fixture::new();
        let controller = fixture.controller(api);
        controller.start_strategy("A").await;
        controller.click(Control::Stop).await;
        controller.click(Control::CloseAll).await;

        assert_eq!(
            fixture.alerts.history(),
            vec![
                format!("Error starting strategy: {}", detail),
                format!("Error stopping strategy: {}", detail),
                format!("Error closing positions: {}", detail),
            ]
        );
        assert!(detail.starts_with("Invalid JSON in response: "));
    }

    #[tokio::test]
    async fn test_close_all_without_message() {
        let mut api = MockAccountApi::new();
        api.expect_close_positions()
            .times(1)
            .returning(|_| Ok(ServerMessage::default()));

        let fixture = Fixture::new();
        fixture.controller(api).close_all_positions().await;

        assert_eq!(fixture.alerts.history(), vec!["Positions closed".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_elements_disable_features() {
        let mut api = MockAccountApi::new();
        api.expect_strategies().never();
        api.expect_positions().never();
        api.expect_stop_strategy().never();
        api.expect_start_strategy().never();

        let mut alerts = MockAlerts::new();
        alerts.expect_alert().never();

        let controller = AccountDashboardController::new(
            Arc::new(api),
            DashboardPage {
                alerts: Arc::new(alerts),
                selector: None,
                table: None,
                controls: vec![Control::Start],
            },
            Symbol::default(),
        );

        controller.initialize().await;
        controller.click(Control::Stop).await;
        controller.click(Control::Start).await;
    }
}
