//! The `BillStore` owns the bill collection for a session and mirrors it to `Storage`.
//!
//! Mutations are applied to the in-memory `Bills` first and then saved as a separate step. A save
//! that fails is logged and reported in the returned `Outcome`, but the mutation still stands.

use crate::calc::Totals;
use crate::model::{Bill, BillId, BillType, Bills};
use crate::storage::Storage;
use crate::Result;
use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace, warn};

/// The storage key under which the bill collection is saved.
pub const BILLS_KEY: &str = "bills";

/// What happened when the store tried to save after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum Persisted {
    /// The collection was written to storage.
    Saved,
    /// Nothing changed so nothing was written.
    Unchanged,
    /// The write failed. The in-memory collection still reflects the mutation.
    Failed(String),
}

impl Persisted {
    pub fn is_failed(&self) -> bool {
        matches!(self, Persisted::Failed(_))
    }
}

/// The result of a store mutation along with the outcome of saving it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    value: T,
    persisted: Persisted,
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn persisted(&self) -> &Persisted {
        &self.persisted
    }
}

/// Holds the authoritative bill collection and the storage it is saved to.
#[derive(Debug)]
pub struct BillStore<S> {
    storage: S,
    bills: Bills,
}

impl<S> BillStore<S>
where
    S: Storage + Send + Sync,
{
    /// Restores the collection saved in `storage`. This never fails: if nothing was saved, or what
    /// was saved cannot be read, the store starts out empty.
    pub async fn load(storage: S) -> Self {
        let bills = match storage.get(BILLS_KEY).await {
            Ok(Some(text)) => match parse_bills(&text) {
                Ok(bills) => {
                    debug!("Loaded {} saved bills", bills.len());
                    bills
                }
                Err(e) => {
                    warn!("Ignoring saved bills that could not be read: {e:#}");
                    Bills::new()
                }
            },
            Ok(None) => {
                debug!("No saved bills found, starting with an empty list");
                Bills::new()
            }
            Err(e) => {
                warn!("Unable to read saved bills, starting with an empty list: {e:#}");
                Bills::new()
            }
        };
        Self { storage, bills }
    }

    /// A read-only view of the bills, newest first.
    pub fn bills(&self) -> &Bills {
        &self.bills
    }

    /// Looks up a single bill.
    pub fn get(&self, id: &BillId) -> Option<&Bill> {
        self.bills.get(id)
    }

    /// The derived totals for the current bills.
    pub fn totals(&self, service_fee: Decimal) -> Totals {
        Totals::compute(&self.bills, service_fee)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Adds an empty bill of `category` at the front of the list.
    pub async fn add(&mut self, category: BillType) -> Outcome<BillId> {
        let id = self.bills.add(category);
        trace!("Added {category} bill {id}");
        self.saved(id, true).await
    }

    /// Removes the bill with `id`. The value is `false` if no bill matched, in which case nothing
    /// changed.
    pub async fn remove(&mut self, id: &BillId) -> Outcome<bool> {
        let removed = self.bills.remove(id);
        if !removed {
            debug!("No bill with id {id} to remove");
        }
        self.saved(removed, removed).await
    }

    /// Replaces the amount text of the bill with `id` verbatim. The value is `false` if no bill
    /// matched, in which case nothing changed.
    pub async fn set_amount(&mut self, id: &BillId, amount: impl Into<String>) -> Outcome<bool> {
        let updated = self.bills.set_amount(id, amount);
        if !updated {
            debug!("No bill with id {id} to update");
        }
        self.saved(updated, updated).await
    }

    /// Empties every bill's amount, keeping the bills.
    pub async fn clear_amounts(&mut self) -> Outcome<()> {
        self.bills.clear_amounts();
        self.saved((), true).await
    }

    /// Writes the whole collection to storage.
    pub async fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.bills).context("Unable to serialize bills")?;
        self.storage
            .set(BILLS_KEY, &json)
            .await
            .context("Unable to save bills")
    }

    async fn saved<T>(&self, value: T, changed: bool) -> Outcome<T> {
        let persisted = if !changed {
            Persisted::Unchanged
        } else {
            match self.save().await {
                Ok(()) => Persisted::Saved,
                Err(e) => {
                    warn!("The change was made but could not be saved: {e:#}");
                    Persisted::Failed(format!("{e:#}"))
                }
            }
        };
        Outcome { value, persisted }
    }
}

fn parse_bills(text: &str) -> Result<Bills> {
    let data: Vec<Bill> =
        serde_json::from_str(text).context("Saved data is not a list of bills")?;
    Bills::from_vec(data).context("Saved bills contain duplicate ids")
}
