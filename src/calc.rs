//! Derives the invoice figures from a collection of bills.
//!
//! Everything here is a pure function of the bills passed in: ordering does not matter and nothing
//! is mutated or stored. Sums and products saturate at `Decimal::MAX` and `Decimal::MIN`, so any
//! bill collection yields totals.

use crate::model::{Amount, Bill, BillType};
use rust_decimal::Decimal;
use serde::Serialize;

/// The figures for one bill type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    /// Sum of the parsed amounts, whatever their sign.
    pub subtotal: Decimal,
    /// The service fee charged once for every fee-eligible bill.
    pub fee: Decimal,
    /// How many bills had a parsed amount strictly greater than zero.
    pub billable: usize,
}

impl CategoryTotals {
    /// The subtotal plus the fee.
    pub fn total(&self) -> Decimal {
        self.subtotal.saturating_add(self.fee)
    }
}

/// All derived figures for a bill collection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub electricity: CategoryTotals,
    pub water: CategoryTotals,
    /// `electricity.subtotal + electricity.fee + water.subtotal + water.fee`
    pub grand_total: Decimal,
}

impl Totals {
    /// Computes the totals for `bills` using `service_fee` as the per-bill fee.
    ///
    /// Each amount is read with `Amount::parse_lenient`, so empty or non-numeric text counts as
    /// zero. Negative amounts are added to the subtotal but never make a bill fee-eligible.
    pub fn compute<'a>(bills: impl IntoIterator<Item = &'a Bill>, service_fee: Decimal) -> Self {
        let mut electricity = Tally::default();
        let mut water = Tally::default();

        for bill in bills {
            let amount = Amount::parse_lenient(bill.amount());
            let tally = match bill.category() {
                BillType::Electricity => &mut electricity,
                BillType::Water => &mut water,
            };
            tally.subtotal = tally.subtotal.saturating_add(amount.value());
            if amount.is_positive() {
                tally.billable += 1;
            }
        }

        let electricity = electricity.finish(service_fee);
        let water = water.finish(service_fee);
        Self {
            electricity,
            water,
            grand_total: electricity.total().saturating_add(water.total()),
        }
    }

    pub fn category(&self, category: BillType) -> &CategoryTotals {
        match category {
            BillType::Electricity => &self.electricity,
            BillType::Water => &self.water,
        }
    }
}

#[derive(Default)]
struct Tally {
    subtotal: Decimal,
    billable: usize,
}

impl Tally {
    fn finish(self, service_fee: Decimal) -> CategoryTotals {
        CategoryTotals {
            subtotal: self.subtotal,
            fee: service_fee.saturating_mul(Decimal::from(self.billable)),
            billable: self.billable,
        }
    }
}

/// The fee owed for a single bill: `service_fee` when its amount is strictly positive, else zero.
pub fn bill_fee(bill: &Bill, service_fee: Decimal) -> Decimal {
    if Amount::parse_lenient(bill.amount()).is_positive() {
        service_fee
    } else {
        Decimal::ZERO
    }
}
