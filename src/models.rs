// src/models.rs
use rust_decimal::Decimal;
use serde::Serialize;

/// One attributed sender→recipient value flow within a single transaction.
///
/// Serialized field order matches the persisted CSV schema:
/// `tx_id, timestamp, sender, recipient, amount_kas`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEdge {
    pub tx_id: String,
    pub timestamp: String, // RFC 3339, UTC
    pub sender: String,
    pub recipient: String,
    pub amount_kas: Decimal, // display unit (sompi / 1e8)
}
