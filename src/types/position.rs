use serde::Deserialize;
use serde_json::Value;

/// Open position as reported by the account API. The server relays the
/// exchange payload untouched, so every field may be missing and may be
/// either a string or a number.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Position {
    pub id: Option<Value>,
    pub symbol: Option<Value>,
    pub size: Option<Value>,
    pub leverage: Option<Value>,
    pub avg_price: Option<Value>,
    pub mark_price: Option<Value>,
    pub side: Option<Value>,
    pub stop_loss: Option<Value>,
    pub take_profit: Option<Value>,
    pub unrealised_pnl: Option<Value>,
}

impl Position {
    /// Builds a position from one entry of the `list` array. Entries that
    /// are not objects carry no fields.
    pub fn from_entry(entry: Value) -> Self {
        match entry {
            Value::Object(_) => serde_json::from_value(entry).unwrap_or_default(),
            _ => Position::default(),
        }
    }

    /// Field values in table column order.
    pub fn fields(&self) -> [Option<&Value>; 10] {
        [
            self.id.as_ref(),
            self.symbol.as_ref(),
            self.size.as_ref(),
            self.leverage.as_ref(),
            self.avg_price.as_ref(),
            self.mark_price.as_ref(),
            self.side.as_ref(),
            self.stop_loss.as_ref(),
            self.take_profit.as_ref(),
            self.unrealised_pnl.as_ref(),
        ]
    }
}

/// Extracts positions from a `{ "list": [...] }` body. `None` when the body
/// has any other shape.
pub fn positions_from_body(body: &Value) -> Option<Vec<Position>> {
    let list = body.get("list")?.as_array()?;
    Some(list.iter().cloned().map(Position::from_entry).collect())
}
