//! Types that represent the core data model, such as `Bill` and `Amount`.
mod amount;
mod bill;

pub use amount::{Amount, AmountError, DEFAULT_CURRENCY_SYMBOL};
pub use bill::{Bill, BillId, BillType, Bills};
