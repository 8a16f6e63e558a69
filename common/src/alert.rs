use serde::{Deserialize, Serialize};

/// Why an alert was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Quantity is at or below the entry's low-stock threshold.
    LowStock,
    /// Expiry date falls within the configured warning window.
    ExpirySoon,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::LowStock => write!(f, "low stock"),
            AlertKind::ExpirySoon => write!(f, "expiring soon"),
        }
    }
}

/// A warning computed by the server from current inventory. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub ean: String,
    pub product_name: String,
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_wire_format() {
        let json = r#"[
            {"type":"low_stock","ean":"96385074","product_name":"Eggs","detail":"Only 1 item(s) left (threshold: 2)"},
            {"type":"expiry_soon","ean":"4006381333931","product_name":"Oat Milk","detail":"Expires in 2 day(s) (2026-10-20)"}
        ]"#;
        let alerts: Vec<Alert> = serde_json::from_str(json).unwrap();
        assert_eq!(alerts[0].kind, AlertKind::LowStock);
        assert_eq!(alerts[1].kind, AlertKind::ExpirySoon);

        let back = serde_json::to_value(&alerts[0]).unwrap();
        assert_eq!(back["type"], "low_stock");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"type":"recall","ean":"96385074","product_name":"Eggs","detail":""}"#;
        assert!(serde_json::from_str::<Alert>(json).is_err());
    }
}
