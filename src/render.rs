//! Text views of the bills and totals: the bill list in several formats, the on-screen summary and
//! the printable invoice.

use crate::calc::{bill_fee, Totals};
use crate::model::{Amount, Bill, BillId, BillType, Bills};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;

const RULE_WIDTH: usize = 44;

/// Renders the bills as pretty JSON in the same shape they are saved in.
pub fn bills_json(bills: &Bills) -> Result<String> {
    serde_json::to_string_pretty(bills).context("Unable to serialize bills to JSON")
}

/// Renders the bills as CSV with an `id,type,amount` header.
pub fn bills_csv(bills: &Bills) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    if bills.is_empty() {
        writer
            .write_record(["id", "type", "amount"])
            .context("Unable to write CSV header")?;
    }
    for bill in bills {
        writer
            .serialize(bill)
            .with_context(|| format!("Unable to write bill {} as CSV", bill.id()))?;
    }
    let bytes = writer.into_inner().context("Unable to finish CSV output")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Renders the bills as a markdown table, newest first. The amount column shows the text exactly
/// as it was entered.
pub fn bills_table(bills: &Bills) -> String {
    let mut out = String::from("| ID | Type | Amount |\n|---|---|---|\n");
    for bill in bills {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            bill.id(),
            bill.category(),
            escape_cell(bill.amount())
        );
    }
    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Renders the on-screen summary. Figures that are not positive are left out, and when the grand
/// total is not positive there is nothing to summarize.
pub fn summary(totals: &Totals, currency_symbol: &str) -> String {
    if totals.grand_total <= Decimal::ZERO {
        return String::from("Nothing to pay yet.\n");
    }

    let mut out = String::from("Summary\n");
    for category in BillType::ALL {
        let figures = totals.category(category);
        summary_line(
            &mut out,
            category.label(),
            figures.subtotal,
            currency_symbol,
        );
        summary_line(
            &mut out,
            &format!("{} service fee", category.label()),
            figures.fee,
            currency_symbol,
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:<24}{:>20}",
        "Total",
        Amount::new(totals.grand_total).format(currency_symbol)
    );
    out
}

fn summary_line(out: &mut String, label: &str, value: Decimal, currency_symbol: &str) {
    if value > Decimal::ZERO {
        let _ = writeln!(
            out,
            "{:<24}{:>20}",
            label,
            Amount::new(value).format(currency_symbol)
        );
    }
}

/// One line of the printed invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceLine {
    pub id: BillId,
    pub category: BillType,
    /// 1-based position among bills of the same type, oldest first.
    pub number: usize,
    pub amount: Decimal,
    pub fee: Decimal,
}

/// Everything that goes on the printed invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub date: NaiveDate,
    pub service_fee: Decimal,
    pub lines: Vec<InvoiceLine>,
    pub totals: Totals,
}

impl Invoice {
    /// Builds the invoice for `bills`. Lines are grouped by bill type; within a type they are
    /// numbered in the order the bills were added.
    pub fn new(bills: &Bills, service_fee: Decimal, date: NaiveDate) -> Self {
        let mut lines = Vec::with_capacity(bills.len());
        for category in BillType::ALL {
            let oldest_first = bills
                .data()
                .iter()
                .rev()
                .filter(|bill| bill.category() == category);
            for (ix, bill) in oldest_first.enumerate() {
                lines.push(line(bill, ix + 1, service_fee));
            }
        }
        Self {
            date,
            service_fee,
            lines,
            totals: Totals::compute(bills, service_fee),
        }
    }

    /// Lays the invoice out as plain text for printing.
    pub fn render(&self, currency_symbol: &str) -> String {
        let money = |value: Decimal| Amount::new(value).format(currency_symbol);
        let rule = "=".repeat(RULE_WIDTH);
        let thin = "-".repeat(RULE_WIDTH);

        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:^RULE_WIDTH$}", "UTILITY SERVICE INVOICE");
        let _ = writeln!(out, "{:^RULE_WIDTH$}", "Electricity and Water");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Date: {}", self.date.format("%Y-%m-%d"));
        let _ = writeln!(out, "Service fee per bill: {}", money(self.service_fee));
        let _ = writeln!(out, "{thin}");
        let _ = writeln!(out, "{:<16}{:>14}{:>14}", "Bill", "Amount", "Fee");
        let _ = writeln!(out, "{thin}");

        if self.lines.is_empty() {
            let _ = writeln!(out, "(no bills)");
        }
        for line in &self.lines {
            let _ = writeln!(
                out,
                "{:<16}{:>14}{:>14}",
                format!("{} #{}", line.category.label(), line.number),
                money(line.amount),
                money(line.fee)
            );
        }

        let _ = writeln!(out, "{thin}");
        for category in BillType::ALL {
            let figures = self.totals.category(category);
            let _ = writeln!(
                out,
                "{:<16}{:>14}{:>14}",
                format!("{} total", category.label()),
                money(figures.subtotal),
                money(figures.fee)
            );
        }
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "{:<16}{:>28}",
            "GRAND TOTAL",
            money(self.totals.grand_total)
        );
        let _ = writeln!(out, "{rule}");
        out
    }
}

fn line(bill: &Bill, number: usize, service_fee: Decimal) -> InvoiceLine {
    InvoiceLine {
        id: bill.id().clone(),
        category: bill.category(),
        number,
        amount: Amount::parse_lenient(bill.amount()).value(),
        fee: bill_fee(bill, service_fee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: Decimal = Decimal::ONE_THOUSAND;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    /// Bills added in the order given, so the last one is first in the collection.
    fn bills(entries: &[(BillType, &str)]) -> Bills {
        let mut bills = Bills::new();
        for (category, amount) in entries {
            let id = bills.add(*category);
            bills.set_amount(&id, *amount);
        }
        bills
    }

    #[test]
    fn test_invoice_numbers_lines_per_category() {
        let bills = bills(&[
            (BillType::Electricity, "100"),
            (BillType::Water, "50"),
            (BillType::Electricity, "0"),
        ]);
        let invoice = Invoice::new(&bills, FEE, date());
        let labels: Vec<_> = invoice
            .lines
            .iter()
            .map(|line| (line.category, line.number, line.amount, line.fee))
            .collect();
        assert_eq!(
            labels,
            vec![
                (BillType::Electricity, 1, Decimal::from(100), FEE),
                (BillType::Electricity, 2, Decimal::ZERO, Decimal::ZERO),
                (BillType::Water, 1, Decimal::from(50), FEE),
            ]
        );
        assert_eq!(invoice.totals.grand_total, Decimal::from(2150));
    }

    #[test]
    fn test_invoice_render() {
        let bills = bills(&[(BillType::Electricity, "12500"), (BillType::Water, "abc")]);
        let text = Invoice::new(&bills, FEE, date()).render("៛");
        assert!(text.contains("Date: 2025-03-01"));
        assert!(text.contains("Electricity #1"));
        assert!(text.contains("12,500៛"));
        assert!(text.contains("Water #1"));
        assert!(text.contains("GRAND TOTAL"));
        assert!(text.contains("13,500៛"));
    }

    #[test]
    fn test_invoice_render_empty() {
        let text = Invoice::new(&Bills::new(), FEE, date()).render("៛");
        assert!(text.contains("(no bills)"));
        assert!(text.contains("GRAND TOTAL"));
    }

    #[test]
    fn test_summary_hides_non_positive_lines() {
        let bills = bills(&[(BillType::Electricity, "100"), (BillType::Water, "")]);
        let totals = Totals::compute(&bills, FEE);
        let text = summary(&totals, "៛");
        assert!(text.contains("Electricity "));
        assert!(text.contains("Electricity service fee"));
        assert!(!text.contains("Water"));
        assert!(text.contains("1,100៛"));
    }

    #[test]
    fn test_summary_nothing_to_pay() {
        let totals = Totals::compute(&bills(&[(BillType::Water, "-5")]), FEE);
        assert_eq!(summary(&totals, "៛"), "Nothing to pay yet.\n");
        assert_eq!(summary(&Totals::default(), "៛"), "Nothing to pay yet.\n");
    }

    #[test]
    fn test_bills_csv() {
        let bills = bills(&[(BillType::Water, "1,000")]);
        let id = bills.data()[0].id().clone();
        let csv = bills_csv(&bills).unwrap();
        assert_eq!(csv, format!("id,type,amount\n{id},WATER,\"1,000\"\n"));
    }

    #[test]
    fn test_bills_csv_empty_has_header() {
        assert_eq!(bills_csv(&Bills::new()).unwrap(), "id,type,amount\n");
    }

    #[test]
    fn test_bills_table() {
        let bills = bills(&[(BillType::Electricity, "a|b")]);
        let table = bills_table(&bills);
        assert!(table.starts_with("| ID | Type | Amount |"));
        assert!(table.contains("| ELECTRICITY | a\\|b |"));
    }

    #[test]
    fn test_bills_json_matches_storage_shape() {
        let bills = bills(&[(BillType::Water, "50")]);
        let json: serde_json::Value = serde_json::from_str(&bills_json(&bills).unwrap()).unwrap();
        assert_eq!(json[0]["type"], "WATER");
        assert_eq!(json[0]["amount"], "50");
    }
}
