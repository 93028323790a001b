// src/attribution.rs
//
// Turns one raw transaction into sender→recipient flow edges. Inputs of a
// UTXO transaction are fungible once combined, so no single input can be
// tied to a single output; splitting each output across input addresses in
// proportion to their contributed value is the least-biased allocation.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::api::RawTransaction;
use crate::models::FlowEdge;

/// Sompi per KAS (base units per display unit).
const SOMPI_PER_KAS: u64 = 100_000_000;

/// Proportional attribution. Emits `|input addresses| × |outputs|` edges;
/// a transaction whose aggregated input total is zero emits none.
pub fn attribute(tx: &RawTransaction, timestamp: &str) -> Vec<FlowEdge> {
    // Collapse multiple inputs from the same address into one contribution.
    // BTreeMap keeps edge order deterministic across runs.
    let mut contributions: BTreeMap<&str, u64> = BTreeMap::new();
    for inp in tx.inputs() {
        *contributions.entry(inp.source_address()).or_insert(0) += inp.amount_sompi();
    }

    let total_input: u64 = contributions.values().sum();
    if total_input == 0 {
        return Vec::new();
    }

    let total = Decimal::from(total_input);
    let per_kas = Decimal::from(SOMPI_PER_KAS);

    let mut edges = Vec::with_capacity(contributions.len() * tx.outputs().len());
    for out in tx.outputs() {
        let paid = Decimal::from(out.amount_sompi());
        for (sender, contribution) in &contributions {
            let weight = Decimal::from(*contribution) / total;
            edges.push(FlowEdge {
                tx_id: tx.id().to_string(),
                timestamp: timestamp.to_string(),
                sender: (*sender).to_string(),
                recipient: out.recipient_address().to_string(),
                amount_kas: paid * weight / per_kas,
            });
        }
    }
    edges
}

/// Unweighted pairing: one edge per (input, output) pair, each carrying the
/// full output amount. Inputs are not aggregated here, so repeated input
/// addresses produce repeated rows.
pub fn pair_all(tx: &RawTransaction, timestamp: &str) -> Vec<FlowEdge> {
    let per_kas = Decimal::from(SOMPI_PER_KAS);
    let mut edges = Vec::with_capacity(tx.inputs().len() * tx.outputs().len());
    for inp in tx.inputs() {
        for out in tx.outputs() {
            edges.push(FlowEdge {
                tx_id: tx.id().to_string(),
                timestamp: timestamp.to_string(),
                sender: inp.source_address().to_string(),
                recipient: out.recipient_address().to_string(),
                amount_kas: Decimal::from(out.amount_sompi()) / per_kas,
            });
        }
    }
    edges
}
