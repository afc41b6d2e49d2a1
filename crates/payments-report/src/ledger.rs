//! Ledger aggregation and balance reconciliation
//!
//! Every transfer is classified relative to the reported wallet and summed into
//! one of six buckets. Two independent balances are then derived from those
//! buckets and compared against the sum of walletd's own per-transaction
//! amounts. Both differences should be zero for a correctly classified export.

use serde::Serialize;

use crate::constants;
use crate::payments::{PaymentsError, PaymentsExport, Transaction, Transfer};

/// Role of a transfer relative to the reported wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferRole {
    /// Funds received in an incoming transaction
    Incoming,
    /// Funds returned to the wallet inside an outgoing transaction
    SentToSelf,
    /// Change output (type 2)
    Change,
    /// Debit from the wallet
    Outgoing,
    /// Funds sent to another address
    SentToOthers,
    /// Transfer with no address
    Ignored,
}

/// Classify a single transfer
///
/// Zero-amount non-change transfers to the wallet count as outgoing, since only
/// a strictly positive amount routes to the incoming branch.
pub fn classify(transfer: &Transfer, transaction: &Transaction, self_address: &str) -> TransferRole {
    if transfer.address == self_address {
        if transfer.kind == constants::CHANGE_TRANSFER_TYPE {
            TransferRole::Change
        } else if transfer.amount > 0 {
            if transaction.amount > 0 {
                TransferRole::Incoming
            } else {
                TransferRole::SentToSelf
            }
        } else {
            TransferRole::Outgoing
        }
    } else if !transfer.address.is_empty() {
        TransferRole::SentToOthers
    } else {
        TransferRole::Ignored
    }
}

/// Running totals in atomic units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerTotals {
    /// Sum of every transaction amount as reported by walletd
    pub transaction: i64,
    pub incoming: i64,
    pub sent_to_self: i64,
    pub change: i64,
    /// Magnitude of debits from the wallet
    pub outgoing: i64,
    pub sent_to_others: i64,
    /// Fees of outgoing transactions
    pub fees: i64,
}

/// One balance derivation compared against the reported total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub balance: i64,
    pub reported: i64,
    pub difference: i64,
}

impl Reconciliation {
    fn new(name: &'static str, balance: i64, reported: i64) -> Result<Self, PaymentsError> {
        let difference = balance
            .checked_sub(reported)
            .ok_or(PaymentsError::Overflow { total: name, amount: reported })?;
        Ok(Self {
            balance,
            reported,
            difference,
        })
    }

    pub fn is_balanced(&self) -> bool {
        self.difference == 0
    }
}

/// Fold signed terms into a balance, failing on overflow
fn sum_terms(name: &'static str, terms: &[i64]) -> Result<i64, PaymentsError> {
    terms.iter().try_fold(0i64, |acc, &amount| {
        acc.checked_add(amount)
            .ok_or(PaymentsError::Overflow { total: name, amount })
    })
}

fn negate(name: &'static str, amount: i64) -> Result<i64, PaymentsError> {
    amount
        .checked_neg()
        .ok_or(PaymentsError::Overflow { total: name, amount })
}

fn add(total: &mut i64, name: &'static str, amount: i64) -> Result<(), PaymentsError> {
    *total = total
        .checked_add(amount)
        .ok_or(PaymentsError::Overflow { total: name, amount })?;
    Ok(())
}

impl LedgerTotals {
    /// Account for a transaction's own amount and fee
    fn record_transaction(&mut self, transaction: &Transaction) -> Result<(), PaymentsError> {
        add(&mut self.transaction, "total_transaction", transaction.amount)?;
        if transaction.is_outgoing() {
            add(&mut self.fees, "total_fees", transaction.fee.unwrap_or_default())?;
        }
        Ok(())
    }

    /// Account for a transfer given its role
    fn record_transfer(&mut self, role: TransferRole, amount: i64) -> Result<(), PaymentsError> {
        match role {
            TransferRole::Incoming => add(&mut self.incoming, "total_incoming", amount),
            TransferRole::SentToSelf => add(&mut self.sent_to_self, "total_sent_to_self", amount),
            TransferRole::Change => add(&mut self.change, "total_change", amount),
            TransferRole::Outgoing => {
                let debit = negate("total_outgoing", amount)?;
                add(&mut self.outgoing, "total_outgoing", debit)
            }
            TransferRole::SentToOthers => {
                add(&mut self.sent_to_others, "total_sent_to_others", amount)
            }
            TransferRole::Ignored => Ok(()),
        }
    }

    /// Incoming / outgoing balance: incoming - outgoing + change + sent to self
    pub fn incoming_outgoing(&self) -> Result<Reconciliation, PaymentsError> {
        const NAME: &str = "incoming/outgoing balance";
        let outgoing = negate(NAME, self.outgoing)?;
        let balance = sum_terms(NAME, &[self.incoming, outgoing, self.change, self.sent_to_self])?;
        Reconciliation::new(NAME, balance, self.transaction)
    }

    /// Sent to others balance: incoming - sent to others - fees
    pub fn sent_to_others(&self) -> Result<Reconciliation, PaymentsError> {
        const NAME: &str = "sent to others balance";
        let sent = negate(NAME, self.sent_to_others)?;
        let fees = negate(NAME, self.fees)?;
        let balance = sum_terms(NAME, &[self.incoming, sent, fees])?;
        Reconciliation::new(NAME, balance, self.transaction)
    }
}

/// Aggregate an export for the given wallet address
///
/// Fees are only read from outgoing transactions; a missing fee there is
/// rejected by `PaymentsExport::validate` before this point and counts as 0
/// if validation was skipped. Both reconciliations are checked here so a
/// returned total can always be reported.
pub fn aggregate(export: &PaymentsExport, self_address: &str) -> Result<LedgerTotals, PaymentsError> {
    let mut totals = LedgerTotals::default();

    for tx in export.transactions() {
        totals.record_transaction(tx)?;
    }

    for (tx, transfer) in export.transfers() {
        let role = classify(transfer, tx, self_address);
        totals.record_transfer(role, transfer.amount)?;
    }

    totals.incoming_outgoing()?;
    totals.sent_to_others()?;

    Ok(totals)
}
