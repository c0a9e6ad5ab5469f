//! Inventory Loader
//!
//! Reads the bookstore's inventory from a CSV file. The file is read fresh on
//! every call so edits to the data file show up on the next caller turn
//! without a restart.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, error, warn};

/// The exact cell value that marks a book as a bestseller.
pub const BESTSELLER_MARKER: &str = "Yes";

/// A single row of the inventory file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "book_name")]
    pub name: String,
    pub author: String,
    pub genre: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
    pub quantity_available: u32,
    pub rating: f32,
    pub format: String,
    pub language: String,
    pub pages: u32,
    #[serde(rename = "discount")]
    pub discount_percent: f32,
    #[serde(rename = "bestseller", deserialize_with = "deserialize_marker")]
    pub is_bestseller: bool,
}

fn deserialize_marker<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw == BESTSELLER_MARKER)
}

/// Parses the cell text directly so the written scale is kept (`18.00` stays `18.00`).
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom)
}

/// A row that could not be turned into an `InventoryItem`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number in the source file, header included.
    pub line: u64,
    pub message: String,
}

/// The outcome of a successful read: the valid rows plus the rejected ones.
#[derive(Debug, Clone, Default)]
pub struct InventoryLoad {
    pub items: Vec<InventoryItem>,
    pub rejected: Vec<RowError>,
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Failed to read inventory file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse inventory header: {0}")]
    Csv(#[from] csv::Error),
}

/// Anything that can produce the current inventory.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn load(&self) -> Result<InventoryLoad, InventoryError>;
}

/// An `InventorySource` backed by a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvInventory {
    path: PathBuf,
}

impl CsvInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl InventorySource for CsvInventory {
    async fn load(&self) -> Result<InventoryLoad, InventoryError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| InventoryError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_inventory(&bytes)
    }
}

/// Parses CSV bytes row by row, keeping valid rows and collecting the rest.
pub fn parse_inventory(bytes: &[u8]) -> Result<InventoryLoad, InventoryError> {
    let mut reader = csv::Reader::from_reader(bytes);
    reader.headers()?;

    let mut load = InventoryLoad::default();
    for (index, row) in reader.deserialize::<InventoryItem>().enumerate() {
        match row {
            Ok(item) => load.items.push(item),
            Err(e) => {
                let line = e
                    .position()
                    .map(|pos| pos.line())
                    .unwrap_or(index as u64 + 2);
                load.rejected.push(RowError {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(load)
}

/// Loads the inventory, substituting an empty list on any failure.
///
/// Callers must tolerate an empty inventory; the assistant then simply has
/// no books to talk about.
pub async fn load_inventory(source: &dyn InventorySource) -> Vec<InventoryItem> {
    match source.load().await {
        Ok(load) => {
            for rejected in &load.rejected {
                warn!(line = rejected.line, error = %rejected.message, "Skipping malformed inventory row");
            }
            debug!(
                books = load.items.len(),
                rejected = load.rejected.len(),
                "Loaded inventory"
            );
            load.items
        }
        Err(e) => {
            error!(error = %e, "Error loading inventory, continuing with none");
            Vec::new()
        }
    }
}
