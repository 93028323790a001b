// src/writer.rs
use csv::WriterBuilder;
use eyre::Result;
use std::path::Path;
use tracing::info;

use crate::dataset::FlowDataset;

/// Make an address usable as a file-name stem.
pub fn sanitize_address(address: &str) -> String {
    address.replace(':', "_")
}

/// Write one dataset as CSV with header
/// `tx_id,timestamp,sender,recipient,amount_kas`, overwriting any prior file.
pub fn write_dataset(path: &Path, dataset: &FlowDataset) -> Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    // written explicitly so an empty dataset still gets a header row
    w.write_record(["tx_id", "timestamp", "sender", "recipient", "amount_kas"])?;
    for edge in dataset.edges() {
        w.serialize(edge)?;
    }
    w.flush()?;
    info!("✅ Saved {} rows to {}", dataset.len(), path.display());
    Ok(())
}
