//! Demo seeder for Folio development and testing.
//!
//! Creates an entity with a small chart of accounts, then raises an invoice,
//! receives payment against it and logs the resulting balances.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use folio_core::account::{Account, AccountType};
use folio_core::transaction::{LineItemInput, NewTransaction, TransactionType};
use folio_core::{Clock, EntityContext, Ledger, SystemClock};
use folio_shared::AppConfig;
use folio_store::MemoryStore;

type DemoLedger = Ledger<MemoryStore, SystemClock>;

/// Accounts used by the demo cycle.
struct Chart {
    receivable: Account,
    revenue: Account,
    bank: Account,
    vat_output: Account,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ledger = Ledger::new(Arc::new(MemoryStore::new()), SystemClock);
    let ledger_config = &config.ledger;
    let (entity, currency) = ledger.create_entity(
        &ledger_config.entity_name,
        &ledger_config.reporting_currency,
        &ledger_config.reporting_currency,
        ledger_config.decimal_places,
    )?;
    info!(entity = %entity.name, currency = %currency.code, "Seeding entity");
    let ctx = EntityContext::from(&entity);

    let chart = seed_chart(&ledger, &ctx)?;
    run_invoice_cycle(&ledger, &ctx, &chart)?;

    info!("Seeding complete");
    Ok(())
}

fn seed_chart(ledger: &DemoLedger, ctx: &EntityContext) -> anyhow::Result<Chart> {
    let account = |name: &str, account_type| {
        ledger
            .create_account(ctx, name, account_type, None)
            .with_context(|| format!("failed to create account {name}"))
    };
    Ok(Chart {
        receivable: account("Clients", AccountType::Receivable)?,
        revenue: account("Consulting Revenue", AccountType::OperatingRevenue)?,
        bank: account("Operating Bank", AccountType::Bank)?,
        vat_output: account("VAT Output", AccountType::TaxOutput)?,
    })
}

fn run_invoice_cycle(ledger: &DemoLedger, ctx: &EntityContext, chart: &Chart) -> anyhow::Result<()> {
    let vat = ledger.create_vat(ctx, "Standard Rate", "S", Decimal::from(16), chart.vat_output.id)?;
    let today = ledger.clock().today();

    let invoice = ledger.new_transaction(
        ctx,
        NewTransaction::new(
            TransactionType::ClientInvoice,
            chart.receivable.id,
            today - Duration::days(14),
            "Advisory services",
        )
        .with_reference("PO-1042"),
    )?;
    ledger.add_line_item(
        ctx,
        invoice.id,
        LineItemInput::new(chart.revenue.id, Decimal::from(250))
            .with_quantity(Decimal::from(4))
            .with_vat(vat.id)
            .with_narration("Four advisory days"),
    )?;
    let invoice = ledger.post(ctx, invoice.id)?;

    let receipt = ledger.new_transaction(
        ctx,
        NewTransaction::new(TransactionType::ClientReceipt, chart.receivable.id, today, "Bank transfer"),
    )?;
    ledger.add_line_item(ctx, receipt.id, LineItemInput::new(chart.bank.id, Decimal::from(700)))?;
    let receipt = ledger.post(ctx, receipt.id)?;

    let clearances = ledger.auto_allocate(ctx, receipt.id)?;
    info!(
        invoice = invoice.transaction_no.as_deref().unwrap_or_default(),
        receipt = receipt.transaction_no.as_deref().unwrap_or_default(),
        clearances = clearances.len(),
        outstanding = %ledger.uncleared_amount(ctx, invoice.id)?.amount,
        "Invoice cycle recorded"
    );

    for account in [&chart.receivable, &chart.revenue, &chart.bank, &chart.vat_output] {
        let balance = ledger.account_balance(ctx, account.id)?;
        info!(account = %account.name, balance = %balance.balance(), "Account balance");
    }
    Ok(())
}
