//! Payment export data model and loading
//!
//! The export is the `getTransactions` result of a TurtleCoin walletd:
//! `items[] -> transactions[] -> transfers[]`. Amounts are signed atomic units.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors raised while validating or aggregating a payment export
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentsError {
    /// Outgoing transaction without a `fee` field
    #[error("items[{item}].transactions[{transaction}]{}: outgoing transaction has no `fee`", hash_suffix(.hash))]
    MissingFee {
        item: usize,
        transaction: usize,
        hash: Option<String>,
    },

    /// A running total left the i64 range
    #[error("{total} overflowed while adding {amount}")]
    Overflow { total: &'static str, amount: i64 },
}

fn hash_suffix(hash: &Option<String>) -> String {
    hash.as_deref().map(|h| format!(" ({})", h)).unwrap_or_default()
}

/// Top-level export document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentsExport {
    pub items: Vec<Item>,
}

/// Block-level grouping of transactions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    pub transactions: Vec<Transaction>,
}

/// A wallet transaction with its net effect on the wallet
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transaction {
    /// Net amount for the wallet (negative when funds left it)
    pub amount: i64,
    /// Network fee, only meaningful for outgoing transactions
    #[serde(default)]
    pub fee: Option<i64>,
    #[serde(default, rename = "transactionHash")]
    pub hash: Option<String>,
    pub transfers: Vec<Transfer>,
}

/// A single output of a transaction
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transfer {
    /// Destination address, empty when walletd could not attribute it
    pub address: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: i64,
}

impl Transaction {
    pub fn is_outgoing(&self) -> bool {
        self.amount < 0
    }
}

impl PaymentsExport {
    /// Iterate over every transaction in export order
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.items.iter().flat_map(|item| item.transactions.iter())
    }

    /// Iterate over every transfer paired with its owning transaction
    pub fn transfers(&self) -> impl Iterator<Item = (&Transaction, &Transfer)> {
        self.transactions()
            .flat_map(|tx| tx.transfers.iter().map(move |transfer| (tx, transfer)))
    }

    /// Check the shape the aggregation relies on beyond what serde enforces
    pub fn validate(&self) -> Result<(), PaymentsError> {
        for (i, item) in self.items.iter().enumerate() {
            for (j, tx) in item.transactions.iter().enumerate() {
                if tx.is_outgoing() && tx.fee.is_none() {
                    return Err(PaymentsError::MissingFee {
                        item: i,
                        transaction: j,
                        hash: tx.hash.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Parse and validate an export from a JSON string
pub fn parse_payments(content: &str) -> Result<PaymentsExport> {
    let export: PaymentsExport = serde_json::from_str(content).with_context(
        || "Failed to parse payments JSON (expected items[].transactions[].transfers[])",
    )?;
    export.validate()?;
    Ok(export)
}

/// Load a payments export from a JSON file
pub fn load_payments(path: &Path) -> Result<PaymentsExport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payments file: {}", path.display()))?;

    parse_payments(&content).with_context(|| format!("Invalid payments file: {}", path.display()))
}
