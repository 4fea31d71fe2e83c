//! Handlers for the read-only commands: list, summary and print.

use crate::args::{ListArgs, ListFormat, PrintArgs};
use crate::calc::Totals;
use crate::commands::Out;
use crate::model::{Amount, Bill};
use crate::render::{self, Invoice};
use crate::{utils, Config, Result};
use chrono::{Local, NaiveDate};

/// Lists the bills, newest first, in the requested format.
pub async fn list_bills(config: Config, args: ListArgs) -> Result<Out<Vec<Bill>>> {
    let store = config.bill_store().await;
    let bills = store.bills();
    let text = match args.format() {
        ListFormat::Json => render::bills_json(bills)?,
        ListFormat::Table => render::bills_table(bills),
        ListFormat::Csv => render::bills_csv(bills)?,
    };
    let count = bills.len();
    let message = format!("Found {} bill{}", count, if count == 1 { "" } else { "s" });
    Ok(Out::new(message, bills.data().to_vec()).with_text(text))
}

/// Computes the subtotals, service fees and grand total.
pub async fn summary(config: Config) -> Result<Out<Totals>> {
    let store = config.bill_store().await;
    let totals = store.totals(config.service_fee());
    let text = render::summary(&totals, config.currency_symbol());
    let message = format!(
        "Grand total is {}",
        Amount::new(totals.grand_total).format(config.currency_symbol())
    );
    Ok(Out::new(message, totals).with_text(text))
}

/// Renders the printable invoice dated today, to stdout or to the file given in `args`.
pub async fn print(config: Config, args: PrintArgs) -> Result<Out<Invoice>> {
    print_on(config, args, Local::now().date_naive()).await
}

async fn print_on(config: Config, args: PrintArgs, date: NaiveDate) -> Result<Out<Invoice>> {
    let store = config.bill_store().await;
    let invoice = Invoice::new(store.bills(), config.service_fee(), date);
    let text = invoice.render(config.currency_symbol());
    match args.output() {
        Some(path) => {
            utils::write(path, &text).await?;
            Ok(Out::new(
                format!("Wrote the invoice to {}", path.display()),
                invoice,
            ))
        }
        None => Ok(Out::new("Rendered the invoice", invoice).with_text(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BillType;
    use crate::test::TestEnv;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_list_bills_csv() {
        let env = TestEnv::new().await;
        let id = env.add_bill(BillType::Water).await;
        env.set_amount(&id, "50").await;

        let out = list_bills(env.config(), ListArgs::new(ListFormat::Csv))
            .await
            .unwrap();
        assert_eq!(out.message(), "Found 1 bill");
        assert_eq!(
            out.text().unwrap(),
            format!("id,type,amount\n{id},WATER,50\n")
        );
        assert_eq!(out.structure().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_bills_empty() {
        let env = TestEnv::new().await;
        let out = list_bills(env.config(), ListArgs::new(ListFormat::Json))
            .await
            .unwrap();
        assert_eq!(out.message(), "Found 0 bills");
        assert_eq!(out.text().unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_summary() {
        let env = TestEnv::new().await;
        let a = env.add_bill(BillType::Electricity).await;
        let b = env.add_bill(BillType::Electricity).await;
        let c = env.add_bill(BillType::Water).await;
        env.set_amount(&a, "100").await;
        env.set_amount(&b, "0").await;
        env.set_amount(&c, "50").await;

        let out = summary(env.config()).await.unwrap();
        let totals = out.structure().unwrap();
        let fee = env.config().service_fee();
        assert_eq!(totals.electricity.subtotal, Decimal::from(100));
        assert_eq!(totals.electricity.fee, fee);
        assert_eq!(totals.water.subtotal, Decimal::from(50));
        assert_eq!(totals.water.fee, fee);
        assert_eq!(totals.grand_total, Decimal::from(150) + fee + fee);
        assert!(out.text().unwrap().contains("Total"));
    }

    #[tokio::test]
    async fn test_summary_after_corrupt_storage() {
        let env = TestEnv::new().await;
        env.add_bill(BillType::Water).await;
        std::fs::write(env.config().bills_path(), "{ not json").unwrap();

        let out = summary(env.config()).await.unwrap();
        assert_eq!(out.structure().unwrap(), &Totals::default());
        assert_eq!(out.text().unwrap(), "Nothing to pay yet.\n");
    }

    #[tokio::test]
    async fn test_print_to_file() {
        let env = TestEnv::new().await;
        let id = env.add_bill(BillType::Electricity).await;
        env.set_amount(&id, "2500").await;
        let path = env.config().root().join("invoice.txt");
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        let out = print_on(env.config(), PrintArgs::new(Some(path.clone())), date)
            .await
            .unwrap();
        assert!(out.message().contains("Wrote the invoice"));
        assert!(out.text().is_none());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Date: 2025-01-31"));
        assert!(written.contains("Electricity #1"));
        assert!(written.contains("2,500៛"));
        assert_eq!(out.structure().unwrap().lines.len(), 1);
    }

    #[tokio::test]
    async fn test_print_to_stdout_text() {
        let env = TestEnv::new().await;
        env.add_bill(BillType::Water).await;
        let out = print(env.config(), PrintArgs::new(None)).await.unwrap();
        assert!(out.text().unwrap().contains("Water #1"));
    }
}
