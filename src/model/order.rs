use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Opaque identifier of the order being processed.
///
/// Passed unchanged into every work item for logging and correlation. No
/// validation is performed; any string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OrderNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OrderNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_is_opaque() {
        let order = OrderNumber::from("Order#1234");
        assert_eq!(order.to_string(), "Order#1234");
        assert_eq!(order.as_str(), "Order#1234");
        assert_eq!(OrderNumber::new(String::new()).as_str(), "");
    }
}
