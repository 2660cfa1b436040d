pub mod dashboard;
pub mod login;

pub use dashboard::*;
pub use login::*;

use crate::api::ApiError;

/// Text shown after "Error ...: ". Failed statuses get the fixed
/// per-action wording; anything else shows the error itself.
fn failure_text(err: &ApiError, status_text: &str) -> String {
    if err.is_status() {
        status_text.to_string()
    } else {
        err.to_string()
    }
}
