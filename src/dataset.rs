// src/dataset.rs
use crate::models::FlowEdge;

/// Append-only collection of flow edges for one tracer run. The same
/// sender/recipient pair appearing in several transactions yields several
/// rows; aggregation is left to downstream consumers.
#[derive(Debug, Default)]
pub struct FlowDataset {
    edges: Vec<FlowEdge>,
}

impl FlowDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, edges: Vec<FlowEdge>) {
        self.edges.extend(edges);
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges where `address` is literally sender or recipient. A pure filter:
    /// an empty dataset projects to an empty dataset, never an error.
    pub fn project(&self, address: &str) -> FlowDataset {
        FlowDataset {
            edges: self
                .edges
                .iter()
                .filter(|e| e.sender == address || e.recipient == address)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn edge(sender: &str, recipient: &str) -> FlowEdge {
        FlowEdge {
            tx_id: "t".to_string(),
            timestamp: "ts".to_string(),
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount_kas: Decimal::ONE,
        }
    }

    #[test]
    fn projection_keeps_exactly_participating_edges() {
        let mut ds = FlowDataset::new();
        ds.extend(vec![
            edge("x", "a"),
            edge("b", "x"),
            edge("a", "b"),
            edge("x", "x"),
        ]);

        let p = ds.project("x");
        assert_eq!(p.len(), 3);
        assert!(p
            .edges()
            .iter()
            .all(|e| e.sender == "x" || e.recipient == "x"));
    }

    #[test]
    fn projection_is_idempotent() {
        let mut ds = FlowDataset::new();
        ds.extend(vec![edge("x", "a"), edge("a", "b")]);

        let once = ds.project("x");
        let twice = once.project("x");
        assert_eq!(once.edges(), twice.edges());
    }

    #[test]
    fn empty_dataset_projects_empty() {
        let ds = FlowDataset::new();
        assert!(ds.project("x").is_empty());
    }
}
