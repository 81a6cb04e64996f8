use std::collections::HashSet;

use leptos::*;
use stock_screener::{CollectionStore, ScreenerState, Sector, StockRecord};

use crate::stocks::{api::FetchStatus, storage::LocalStore};

#[cfg(target_arch = "wasm32")]
use std::{cell::Cell, rc::Rc};

#[cfg(target_arch = "wasm32")]
use stock_screener::FilterDictionary;

use super::{
    collections::CollectionsPanel, filters::FiltersPanel, stock_table::StockTable,
    summary::SummaryPanel,
};

#[derive(Clone, Copy)]
pub struct ScreenerSignal(pub RwSignal<ScreenerState<LocalStore>>);

#[derive(Clone, Copy)]
pub struct CollectionsSignal(pub RwSignal<CollectionStore<LocalStore>>);

#[derive(Clone, Copy)]
pub struct SelectedSymbolSignal(pub RwSignal<Option<String>>);

#[derive(Clone, Copy)]
pub struct FetchStatusSignal(pub RwSignal<FetchStatus>);

/// Filter inputs that are not plain text boxes.
///
/// `reset_epoch` is bumped by "Reset filters" so every input clears its own text.
#[derive(Clone, Copy)]
pub struct FilterState {
    pub sectors: RwSignal<HashSet<Sector>>,
    pub reset_epoch: RwSignal<u32>,
}

/// Top-level dashboard wrapper providing shared application state via context.
#[component]
pub fn Dashboard() -> impl IntoView {
    let screener = create_rw_signal(ScreenerState::new(LocalStore));
    seed_demo_data(&screener);

    let collections = create_rw_signal(open_collections());
    let selected_symbol = create_rw_signal(None::<String>);
    let fetch_status = create_rw_signal(FetchStatus::Idle);
    let filter_state = FilterState {
        sectors: create_rw_signal(HashSet::new()),
        reset_epoch: create_rw_signal(0),
    };

    #[cfg(target_arch = "wasm32")]
    {
        let filters = create_memo(move |_| screener.with(|state| state.filters().clone()));
        let generation = Rc::new(Cell::new(0u64));
        let url = resolve_screener_url();
        create_effect(move |_| {
            let body = filters.get();
            refresh_results(url.clone(), body, screener, fetch_status, Rc::clone(&generation));
        });
    }

    provide_context(ScreenerSignal(screener));
    provide_context(CollectionsSignal(collections));
    provide_context(SelectedSymbolSignal(selected_symbol));
    provide_context(FetchStatusSignal(fetch_status));
    provide_context(filter_state);

    view! {
        <div class="dashboard">
            <header class="dashboard__header">
                <h1>"Stock Screener"</h1>
                <p>"Filter the market, sort the results, keep what matters in collections."</p>
            </header>
            <section class="dashboard__body">
                <aside class="dashboard__sidebar">
                    <FiltersPanel />
                </aside>
                <div class="dashboard__main">
                    <SummaryPanel />
                    <StockTable />
                </div>
                <aside class="dashboard__sidebar">
                    <CollectionsPanel />
                </aside>
            </section>
        </div>
    }
}

fn open_collections() -> CollectionStore<LocalStore> {
    match CollectionStore::open(LocalStore) {
        Ok(collections) => collections,
        Err(err) => {
            log::warn!("discarding cached collections: {err}");
            CollectionStore::empty(LocalStore)
        }
    }
}

fn seed_demo_data(screener: &RwSignal<ScreenerState<LocalStore>>) {
    let seed = [
        ("AAPL", "Apple Inc.", 189.84, -0.42, 52_000_000.0, 2.95e12, "Technology"),
        ("XOM", "Exxon Mobil Corporation", 104.21, 1.18, 17_500_000.0, 4.15e11, "Energy"),
        ("JNJ", "Johnson & Johnson", 152.77, 0.35, 7_200_000.0, 3.68e11, "Healthcare"),
        ("NEE", "NextEra Energy, Inc.", 71.03, -1.64, 10_100_000.0, 1.46e11, "Utilities"),
    ];

    let records: Vec<StockRecord> = seed
        .into_iter()
        .map(|(symbol, name, price, change, volume, market_cap, sector)| StockRecord {
            name: Some(name.into()),
            price: Some(price),
            percent_change: Some(change),
            regular_market_volume: Some(volume),
            market_cap: Some(market_cap),
            sector: Some(sector.into()),
            ..StockRecord::new(symbol)
        })
        .collect();

    screener.update(|state| state.set_records(records));
}

#[cfg(target_arch = "wasm32")]
fn refresh_results(
    url: String,
    body: FilterDictionary,
    screener: RwSignal<ScreenerState<LocalStore>>,
    status: RwSignal<FetchStatus>,
    generation: Rc<Cell<u64>>,
) {
    use crate::stocks::api::fetch_screen;

    let request_id = generation.get() + 1;
    generation.set(request_id);
    status.set(FetchStatus::Loading);

    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_screen(&url, &body).await;
        // A newer filter change superseded this request.
        if generation.get() != request_id {
            return;
        }
        match result {
            Ok(stocks) => {
                status.set(FetchStatus::Loaded(stocks.len()));
                screener.update(|state| state.set_records(stocks));
            }
            Err(err) => {
                log::error!("screening request failed: {err}");
                status.set(FetchStatus::Failed(err.to_string()));
            }
        }
    });
}

#[cfg(target_arch = "wasm32")]
fn resolve_screener_url() -> String {
    use stock_screener::constants::{DEFAULT_API_BASE_URL, SCREENER_PATH};

    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .filter(|origin| !origin.is_empty() && origin != "null")
        .map(|origin| format!("{origin}/api/{SCREENER_PATH}"))
        .unwrap_or_else(|| format!("{DEFAULT_API_BASE_URL}/{SCREENER_PATH}"))
}
