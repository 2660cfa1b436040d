use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::api::{AccountApi, LoginReply};
use crate::view::{Alerts, CredentialForm, Navigator};

pub const MISSING_CREDENTIALS: &str = "Username and password are required.";
pub const LOGIN_FAILED: &str = "Login failed. Please check the console for more information.";

/// Elements of the login page.
pub struct LoginPage {
    pub form: Option<Arc<dyn CredentialForm>>,
    pub alerts: Arc<dyn Alerts>,
    pub navigator: Arc<dyn Navigator>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// A field was empty; nothing was sent.
    Rejected,
    Redirected(Url),
    Completed { message: Option<String> },
    Failed,
}

pub struct LoginController {
    api: Arc<dyn AccountApi>,
    form: Arc<dyn CredentialForm>,
    alerts: Arc<dyn Alerts>,
    navigator: Arc<dyn Navigator>,
}

impl LoginController {
    /// Binds to the page's login form. Without a form there is nothing to
    /// submit, so the controller is not created.
    pub fn initialize(api: Arc<dyn AccountApi>, page: LoginPage) -> Option<Self> {
        let Some(form) = page.form else {
            error!("Login form not found on the page.");
            return None;
        };

        Some(Self {
            api,
            form,
            alerts: page.alerts,
            navigator: page.navigator,
        })
    }

    /// Submit handler. One request per call at most.
    pub async fn submit(&self) -> LoginOutcome {
        let credential = self.form.credential();
        if !credential.is_complete() {
            self.alerts.alert(MISSING_CREDENTIALS);
            return LoginOutcome::Rejected;
        }

        match self.api.login(&credential).await {
            Ok(LoginReply::Redirected(url)) => {
                self.navigator.navigate(&url);
                LoginOutcome::Redirected(url)
            }
            Ok(LoginReply::Body(reply)) => {
                let message = reply.message.filter(|m| !m.is_empty());
                if let Some(message) = &message {
                    self.alerts.alert(message);
                }
                info!("Login completed for {}", credential.username);
                LoginOutcome::Completed { message }
            }
            Err(e) => {
                error!("Login error: {}", e);
                if let Some(detail) = e.server_message() {
                    debug!("Login rejected by server: {}", detail);
                }
                self.alerts.alert(LOGIN_FAILED);
                LoginOutcome::Failed
            }
        }
    }
}
