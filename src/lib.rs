//! A utility-bill invoice calculator.
//!
//! Bills for electricity and water are kept in a `BillStore`, which saves them to `Storage` after
//! every change. `Totals` derives the subtotals, per-bill service fees and grand total from them,
//! and `render` turns both into text for the screen or for printing.

pub mod args;
pub mod calc;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod render;
pub mod storage;
pub mod store;
mod utils;


pub use calc::{CategoryTotals, Totals};
pub use config::{Config, DEFAULT_SERVICE_FEE};
pub use error::Error;
pub use error::Result;
pub use store::BillStore;
