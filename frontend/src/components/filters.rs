use std::{cell::RefCell, collections::HashSet, rc::Rc};

use gloo_timers::callback::Timeout;
use leptos::{ev, event_target_checked, event_target_value, *};
use stock_screener::constants::SEARCH_DEBOUNCE_MS;
use stock_screener::filters::{operands, FilterKey, Operator};
use stock_screener::{FilterCriterion, Sector};

use super::dashboard::{FilterState, ScreenerSignal};

#[component]
pub fn FiltersPanel() -> impl IntoView {
    let screener = use_context::<ScreenerSignal>().expect("screener context missing");
    let filters = use_context::<FilterState>().expect("filter state context missing");

    // Checked sectors become `sector.{label}` entries, in display order.
    create_effect(move |_| {
        let checked: Vec<&'static str> = filters.sectors.with(|set| {
            Sector::ALL
                .into_iter()
                .filter(|sector| set.contains(sector))
                .map(Sector::label)
                .collect()
        });
        screener.0.update(|state| {
            state
                .filters_mut()
                .reconcile_categories(operands::SECTOR, checked);
        });
    });

    let reset = move |_| {
        filters.sectors.set(HashSet::new());
        filters.reset_epoch.update(|epoch| *epoch += 1);
        screener.0.update(|state| state.reset_filters());
    };

    view! {
        <section class="filters-panel">
            <h2>"Filters"</h2>
            <ActiveFilters />
            <div class="filters-panel__group">
                <h3>"Search"</h3>
                <TextFilter operand=operands::SYMBOL label="Ticker" uppercase=true />
                <TextFilter operand=operands::INDUSTRY label="Industry" uppercase=false />
            </div>
            <div class="filters-panel__group">
                <h3>"Ranges"</h3>
                <RangeFilter operand=operands::PRICE label="Price" />
                <RangeFilter operand=operands::MARKET_CAP label="Market cap" />
                <RangeFilter operand=operands::VOLUME label="Volume" />
                <RangeFilter operand=operands::PERCENT_CHANGE label="Change %" />
            </div>
            <div class="filters-panel__group">
                <h3>"Sectors"</h3>
                <div class="filters-panel__options filters-panel__options--grid">
                    <For
                        each=move || Sector::ALL.into_iter()
                        key=|sector| *sector
                        children=move |sector| {
                            view! {
                                <label class="filters-panel__option">
                                    <input
                                        type="checkbox"
                                        on:input=move |ev: ev::Event| {
                                            let checked = event_target_checked(&ev);
                                            filters.sectors.update(|set: &mut HashSet<Sector>| {
                                                if checked {
                                                    set.insert(sector);
                                                } else {
                                                    set.remove(&sector);
                                                }
                                            });
                                        }
                                        prop:checked=move || filters.sectors.with(|set| set.contains(&sector))
                                    />
                                    <span>{sector.label()}</span>
                                </label>
                            }
                        }
                    />
                </div>
            </div>
            <button class="filters-panel__clear" on:click=reset>
                "Reset filters"
            </button>
        </section>
    }
}

#[component]
fn ActiveFilters() -> impl IntoView {
    let screener = use_context::<ScreenerSignal>().expect("screener context missing");
    let filters = use_context::<FilterState>().expect("filter state context missing");

    let chips = create_memo(move |_| {
        screener.0.with(|state| {
            state
                .filters()
                .iter()
                .map(|(key, criterion)| (key.clone(), criterion.clone()))
                .collect::<Vec<_>>()
        })
    });

    let remove = move |key: FilterKey, criterion: FilterCriterion| {
        let sector = (criterion.operand == operands::SECTOR)
            .then(|| criterion.category_name().and_then(Sector::from_label))
            .flatten();
        match sector {
            Some(sector) => filters.sectors.update(|set| {
                set.remove(&sector);
            }),
            None => screener.0.update(|state| {
                state.filters_mut().remove(key.as_str());
            }),
        }
    };

    view! {
        <Show when=move || chips.with(|chips| !chips.is_empty())>
            <ul class="filter-chips">
                <For
                    each=move || chips.get()
                    key=|(key, _)| key.clone()
                    children=move |(key, criterion): (FilterKey, FilterCriterion)| {
                        let label = criterion.describe();
                        view! {
                            <li class="filter-chip">
                                <span>{label}</span>
                                <button
                                    class="filter-chip__remove"
                                    on:click=move |_| remove(key.clone(), criterion.clone())
                                >
                                    "×"
                                </button>
                            </li>
                        }
                    }
                />
            </ul>
        </Show>
    }
}

/// Min/max pair stored as `{operand}__gte` and `{operand}__lte`.
#[component]
fn RangeFilter(operand: &'static str, label: &'static str) -> impl IntoView {
    let screener = use_context::<ScreenerSignal>().expect("screener context missing");
    let filters = use_context::<FilterState>().expect("filter state context missing");

    let min_text = create_rw_signal(String::new());
    let max_text = create_rw_signal(String::new());
    let warning = create_rw_signal(None::<String>);

    clear_on_reset(filters, &[min_text, max_text]);
    clear_when_removed(screener, FilterKey::comparison(operand, Operator::Gte), min_text, is_bound);
    clear_when_removed(screener, FilterKey::comparison(operand, Operator::Lte), max_text, is_bound);
    create_effect(move |_| {
        let _ = filters.reset_epoch.get();
        warning.set(None);
    });

    let apply = move || {
        let min = parse_bound(&min_text.get_untracked());
        let max = parse_bound(&max_text.get_untracked());
        let update = screener
            .0
            .try_update(|state| state.filters_mut().set_range(operand, min, max));
        warning.set(
            update
                .and_then(|update| update.warning)
                .map(|warning| warning.message(label)),
        );
    };

    view! {
        <div class="range-filter">
            <span class="range-filter__label">{label}</span>
            <input
                type="text"
                inputmode="decimal"
                placeholder="Min"
                prop:value=move || min_text.get()
                on:input=move |ev| {
                    min_text.set(event_target_value(&ev));
                    apply();
                }
            />
            <input
                type="text"
                inputmode="decimal"
                placeholder="Max"
                prop:value=move || max_text.get()
                on:input=move |ev| {
                    max_text.set(event_target_value(&ev));
                    apply();
                }
            />
            <Show when=move || warning.with(Option::is_some)>
                <p class="range-filter__warning">{move || warning.get().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}

/// Free-text `contains` filter, applied once typing pauses.
#[component]
fn TextFilter(operand: &'static str, label: &'static str, uppercase: bool) -> impl IntoView {
    let screener = use_context::<ScreenerSignal>().expect("screener context missing");
    let filters = use_context::<FilterState>().expect("filter state context missing");

    let text = create_rw_signal(String::new());
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

    clear_on_reset(filters, &[text]);
    clear_when_removed(
        screener,
        FilterKey::comparison(operand, Operator::Contains),
        text,
        has_text,
    );
    {
        // A timer still pending at reset would re-add the cleared text.
        let pending = Rc::clone(&pending);
        create_effect(move |previous: Option<u32>| {
            let epoch = filters.reset_epoch.get();
            if previous.is_some() {
                drop(pending.borrow_mut().take());
            }
            epoch
        });
    }

    let on_input = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        text.set(value.clone());
        let value = if uppercase { value.to_uppercase() } else { value };
        // Replacing the handle cancels the previous timer.
        *pending.borrow_mut() = Some(Timeout::new(SEARCH_DEBOUNCE_MS, move || {
            screener.0.update(|state| {
                state.filters_mut().set_text(operand, &value);
            });
        }));
    };

    view! {
        <label class="text-filter">
            <span>{label}</span>
            <input type="search" prop:value=move || text.get() on:input=on_input />
        </label>
    }
}

fn clear_on_reset(filters: FilterState, inputs: &[RwSignal<String>]) {
    let inputs = inputs.to_vec();
    create_effect(move |previous: Option<u32>| {
        let epoch = filters.reset_epoch.get();
        if previous.is_some() {
            for input in &inputs {
                input.set(String::new());
            }
        }
        epoch
    });
}

/// Empty the input once its entry leaves the dictionary from elsewhere,
/// e.g. via a chip.
///
/// `applies` tells whether the current text would produce an entry; when it
/// would not, the input itself dropped the entry (a half-typed number) and
/// its text is left alone.
fn clear_when_removed(
    screener: ScreenerSignal,
    key: FilterKey,
    input: RwSignal<String>,
    applies: fn(&str) -> bool,
) {
    let active = create_memo(move |_| screener.0.with(|state| state.filters().contains_key(key.as_str())));
    create_effect(move |was_active: Option<bool>| {
        let is_active = active.get();
        if was_active == Some(true) && !is_active && input.with_untracked(|text| applies(text)) {
            input.set(String::new());
        }
        is_active
    });
}

fn parse_bound(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn is_bound(text: &str) -> bool {
    parse_bound(text).is_some()
}

fn has_text(text: &str) -> bool {
    !text.trim().is_empty()
}
