use std::fmt;

pub const DEFAULT_SYMBOL: &str = "BTCUSDT";

/// Trading-pair identifier as the account API expects it in paths and bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("symbol '{}' must be alphanumeric", s));
        }
        Ok(Symbol(s.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol(DEFAULT_SYMBOL.to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
