use leptos::*;
use stock_screener::constants::MOVERS_COUNT;

use crate::stocks::api::FetchStatus;

use super::dashboard::{FetchStatusSignal, ScreenerSignal};

#[component]
pub fn SummaryPanel() -> impl IntoView {
    let screener = use_context::<ScreenerSignal>().expect("screener context missing");
    let fetch_status = use_context::<FetchStatusSignal>().expect("fetch status context missing");

    let summary = create_memo(move |_| {
        screener.0.with(|state| {
            let total = state.records().len();
            let (gainers, losers) = state.movers(MOVERS_COUNT);
            (total, gainers, losers)
        })
    });

    let status_badge = move || match fetch_status.0.get() {
        FetchStatus::Idle => ("status--idle", "Idle".to_string()),
        FetchStatus::Loading => ("status--loading", "Loading".to_string()),
        FetchStatus::Loaded(_) => ("status--loaded", "Up to date".to_string()),
        FetchStatus::Failed(reason) => ("status--failed", format!("Failed: {reason}")),
    };

    view! {
        <section class="summary-panel">
            <header class="summary-panel__header">
                <div class="summary-panel__status">
                    {move || {
                        let (class, label) = status_badge();
                        view! { <span class=format!("status-badge {class}")>{label}</span> }
                    }}
                    <span class="summary-panel__total">
                        {move || {
                            let (total, _, _) = summary.get();
                            format!("{total} Results")
                        }}
                    </span>
                </div>
            </header>
            <div class="summary-panel__body">
                <div>
                    <h3>"Top Gainers"</h3>
                    <SummaryList items=move || summary.get().1 empty_label="No gainers" />
                </div>
                <div>
                    <h3>"Top Losers"</h3>
                    <SummaryList items=move || summary.get().2 empty_label="No losers" />
                </div>
            </div>
        </section>
    }
}

#[component]
fn SummaryList<F>(items: F, empty_label: &'static str) -> impl IntoView
where
    F: Fn() -> Vec<(String, f64)> + 'static,
{
    let data = create_memo(move |_| items());

    view! {
        <ul class="summary-list">
            <Show
                when=move || data.with(|items| !items.is_empty())
                fallback=move || view! { <li class="summary-list__empty">{empty_label}</li> }
            >
                <For
                    each=move || data.get()
                    key=|(symbol, _)| symbol.clone()
                    children=move |(symbol, change): (String, f64)| {
                        let positive = change >= 0.0;
                        view! {
                            <li>
                                <span class="summary-list__symbol">{symbol}</span>
                                <span class="summary-list__change" class:positive=positive class:negative=!positive>
                                    {format!("{change:+.2}%")}
                                </span>
                            </li>
                        }
                    }
                />
            </Show>
        </ul>
    }
}
