//! Handlers for the commands that change bills: add, remove, set and clear.
//!
//! Each loads the saved bills, applies one change through the `BillStore`, which saves it, and
//! reports what happened. A failed save is reported in the message but is not an error.

use crate::args::{AddArgs, RemoveArgs, SetArgs};
use crate::commands::{note_persisted, Out};
use crate::model::BillId;
use crate::store::Outcome;
use crate::{Config, Result};

/// Adds a new, empty bill at the front of the list. The new id is written to stdout.
pub async fn add_bill(config: Config, args: AddArgs) -> Result<Out<Outcome<BillId>>> {
    let mut store = config.bill_store().await;
    let outcome = store.add(args.category()).await;
    let id = outcome.value().clone();
    let message = note_persisted(
        format!("Added {} bill {id}", args.category().label().to_lowercase()),
        outcome.persisted(),
    );
    Ok(Out::new(message, outcome).with_text(id.to_string()))
}

/// Removes a bill by id. An id that matches nothing leaves the bills untouched.
pub async fn remove_bill(config: Config, args: RemoveArgs) -> Result<Out<Outcome<bool>>> {
    let mut store = config.bill_store().await;
    let id = BillId::from(args.id());
    let outcome = store.remove(&id).await;
    let message = if *outcome.value() {
        format!("Removed bill {id}")
    } else {
        format!("No bill with id {id}, nothing was removed")
    };
    let message = note_persisted(message, outcome.persisted());
    Ok(Out::new(message, outcome))
}

/// Sets the amount text of a bill exactly as given. An id that matches nothing leaves the bills
/// untouched.
pub async fn set_amount(config: Config, args: SetArgs) -> Result<Out<Outcome<bool>>> {
    let mut store = config.bill_store().await;
    let id = BillId::from(args.id());
    let outcome = store.set_amount(&id, args.amount()).await;
    let message = if *outcome.value() {
        format!("Set the amount of bill {id} to '{}'", args.amount())
    } else {
        format!("No bill with id {id}, nothing was changed")
    };
    let message = note_persisted(message, outcome.persisted());
    Ok(Out::new(message, outcome))
}

/// Empties the amount of every bill.
pub async fn clear_amounts(config: Config) -> Result<Out<Outcome<()>>> {
    let mut store = config.bill_store().await;
    let count = store.bills().len();
    let outcome = store.clear_amounts().await;
    let message = note_persisted(
        format!(
            "Cleared the amount{} of {} bill{}",
            if count == 1 { "" } else { "s" },
            count,
            if count == 1 { "" } else { "s" }
        ),
        outcome.persisted(),
    );
    Ok(Out::new(message, outcome))
}
