use serde::Serialize;
use serde_json::Value;

/// Named server-side strategy. The server sends its full trading config per
/// entry; only the name is used here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartStrategyRequest<'a> {
    pub strategy: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClosePositionsRequest<'a> {
    pub symbol: &'a str,
}

/// Extracts strategies from a JSON array body, skipping entries without a
/// string `name`. `None` when the body is not an array.
pub fn strategies_from_body(body: &Value) -> Option<Vec<Strategy>> {
    let entries = body.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(|entry| entry.get("name")?.as_str())
            .map(|name| Strategy { name: name.to_string() })
            .collect(),
    )
}
