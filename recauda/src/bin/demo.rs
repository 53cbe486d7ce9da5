//! Scripted walk through the screens, driven by stores.
//!
//! ```bash
//! RUST_LOG=recauda=debug cargo run --bin recauda-demo -- --metrics
//! ```
//!
//! Environment variables are described on [`Config`].

use anyhow::Context;
use recauda::backend::SimulatedBackend;
use recauda::receipts::LogReceiptPrinter;
use recauda::routes::LogNavigator;
use recauda::screens::{
    BuyersAction, BuyersEnvironment, BuyersReducer, BuyersState, SellersAction, SellersEnvironment,
    SellersReducer, SellersState,
};
use recauda::views::EventFilter;
use recauda::wizard::{AddSellerEdit, AddSellerFlow, WizardAction, WizardEnvironment, WizardFlow, WizardReducer};
use recauda::{BuyerId, Catalog, Config, EventId, SellerId};
use recauda_core::environment::Navigator;
use recauda_runtime::Store;
use recauda_runtime::metrics::MetricsRecorder;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const WAIT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recauda=info")))
        .init();

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    tracing::info!(?config, "Configuration loaded");

    let recorder = if std::env::args().any(|arg| arg == "--metrics") {
        Some(MetricsRecorder::install().context("installing metrics recorder")?)
    } else {
        None
    };

    let catalog = Catalog::demo();
    let issues = catalog.log_integrity();
    tracing::info!(
        events = catalog.events.len(),
        sellers = catalog.sellers.len(),
        buyers = catalog.buyers.len(),
        issues,
        "Catalog loaded"
    );

    let navigator: Arc<dyn Navigator> = Arc::new(LogNavigator);
    let backend = Arc::new(SimulatedBackend::new(config.submit_delay()));

    buyers_session(&catalog, &config).await?;
    sellers_session(&catalog, &config, Arc::clone(&navigator), backend.clone()).await?;
    add_seller_session(&config, navigator, backend).await?;

    if let Some(recorder) = recorder {
        println!("{}", recorder.render());
    }
    Ok(())
}

async fn buyers_session(catalog: &Catalog, config: &Config) -> anyhow::Result<()> {
    let timings = config.snackbar_timings();
    let store = Store::new(
        BuyersState::new(catalog.buyers.clone(), catalog.events.clone(), catalog.sellers.clone()),
        BuyersReducer::new(&timings),
        BuyersEnvironment::new(Arc::new(LogReceiptPrinter), timings),
    );

    let summary = store.state(|state| state.view().summary).await;
    tracing::info!(?summary, "Buyers list");

    store.send(BuyersAction::ToggleSelectAll).await?;
    store
        .send(BuyersAction::PrintReceipts)
        .await?
        .wait_with_timeout(WAIT)
        .await
        .context("printing receipts")?;
    let notice = store.state(|state| state.snackbar.notice.clone()).await;
    tracing::info!(?notice, "Receipts queued");

    store.send(BuyersAction::ClearSelection).await?;
    store
        .send(BuyersAction::EventFilterChanged(EventFilter::Event(EventId::new("2"))))
        .await?;
    store.send(BuyersAction::ToggleRow(BuyerId::new("3"))).await?;
    let bulk = store.state(BuyersState::bulk_action).await;
    tracing::info!(?bulk, "Food-sale selection");
    store.send(BuyersAction::SetDelivered(true)).await?;

    let delivered = store
        .state(|state| state.view().rows.iter().filter(|row| row.delivered).count())
        .await;
    tracing::info!(delivered, "Delivery flags updated");

    store.dispose();
    Ok(())
}

async fn sellers_session(
    catalog: &Catalog,
    config: &Config,
    navigator: Arc<dyn Navigator>,
    backend: Arc<SimulatedBackend>,
) -> anyhow::Result<()> {
    let timings = config.snackbar_timings();
    let store = Store::new(
        SellersState::new(catalog.sellers.clone(), catalog.events.clone()),
        SellersReducer::new(&timings),
        SellersEnvironment::new(navigator, backend, timings),
    );

    store.send(SellersAction::SearchChanged("gonz".to_string())).await?;
    let names = store
        .state(|state| state.view().rows.into_iter().map(|row| row.name).collect::<Vec<_>>())
        .await;
    tracing::info!(?names, "Sellers matching search");

    store.send(SellersAction::SearchChanged(String::new())).await?;
    store.send(SellersAction::ToggleRow(SellerId::new("5"))).await?;
    store.send(SellersAction::OpenAssignment).await?;
    store
        .send(SellersAction::AssignToExistingEvent(EventId::new("2")))
        .await?;
    let assigned = store
        .state(|state| {
            state
                .sellers
                .iter()
                .find(|seller| seller.id.as_str() == "5")
                .map(|seller| seller.assigned_events.clone())
        })
        .await;
    tracing::info!(?assigned, "Sofía López assigned");

    store.send(SellersAction::BeginEdit(SellerId::new("2"))).await?;
    store
        .send(SellersAction::SaveEdit)
        .await?
        .wait_with_timeout(WAIT)
        .await
        .context("saving seller edit")?;
    let notice = store.state(|state| state.snackbar.notice.clone()).await;
    tracing::info!(?notice, "Seller edit saved");

    store.dispose();
    Ok(())
}

async fn add_seller_session(
    config: &Config,
    navigator: Arc<dyn Navigator>,
    backend: Arc<SimulatedBackend>,
) -> anyhow::Result<()> {
    let reducer = WizardReducer::new(AddSellerFlow);
    let store = Store::new(
        reducer.initial_state(),
        reducer.clone(),
        WizardEnvironment::new(navigator, backend, config.validation_rules()),
    );

    for edit in [
        AddSellerEdit::FirstName("Juan".to_string()),
        AddSellerEdit::LastName("Pérez".to_string()),
        AddSellerEdit::Phone("3584 123 456".to_string()),
    ] {
        store.send(WizardAction::Edit(edit)).await?;
    }

    let total = AddSellerFlow.total_steps();
    loop {
        let (step, title, errors) = store
            .state(|state| (state.step, reducer.step_title(state), state.errors.clone()))
            .await;
        tracing::info!(step, title, "Wizard step");
        if !errors.is_empty() {
            anyhow::bail!("step {step} did not validate: {errors:?}");
        }
        if step == total {
            break;
        }
        store.send(WizardAction::Continue).await?;
    }

    let mut submit = store.send(WizardAction::Confirm).await?;
    submit.wait_with_timeout(WAIT).await.context("submitting seller")?;
    let (created, error) = store
        .state(|state| (state.created_id().map(str::to_string), state.last_error.clone()))
        .await;
    tracing::info!(?created, ?error, "Seller submitted");
    store.send(WizardAction::Finish).await?;
    store.dispose();
    Ok(())
}
