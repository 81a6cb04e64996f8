use leptos::*;
use stock_screener::{Column, SortDirection};

use super::dashboard::{ScreenerSignal, SelectedSymbolSignal};

#[component]
pub fn StockTable() -> impl IntoView {
    let screener = use_context::<ScreenerSignal>().expect("screener context missing");
    let selected_symbol =
        use_context::<SelectedSymbolSignal>().expect("selected symbol context missing");

    let rows = create_memo(move |_| screener.0.with(|state| state.rows()));
    let columns = create_memo(move |_| screener.0.with(|state| state.visible_columns()));

    view! {
        <section class="stock-table">
            <header class="stock-table__header">
                <h2>"Results"</h2>
                <ColumnPicker />
            </header>
            <table>
                <thead>
                    <tr>
                        <For
                            each=move || columns.get()
                            key=|column| *column
                            children=move |column: Column| {
                                view! { <HeaderCell column=column /> }
                            }
                        />
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let visible = columns.get();
                        rows.get()
                            .into_iter()
                            .map(|row| {
                                let symbol_for_click = row.symbol.clone();
                                let symbol_for_selected = row.symbol.clone();
                                let cells = visible
                                    .iter()
                                    .map(|column| view! { <td>{column.cell(&row)}</td> })
                                    .collect_view();
                                view! {
                                    <tr
                                        on:click=move |_| {
                                            selected_symbol.0.set(Some(symbol_for_click.clone()));
                                        }
                                        class:selected=move || {
                                            selected_symbol.0.get().as_deref() == Some(symbol_for_selected.as_str())
                                        }
                                    >
                                        {cells}
                                    </tr>
                                }
                            })
                            .collect_view()
                    }}
                </tbody>
            </table>
        </section>
    }
}

/// Header cell; sortable columns cycle asc, desc, unsorted on click.
#[component]
fn HeaderCell(column: Column) -> impl IntoView {
    let screener = use_context::<ScreenerSignal>().expect("screener context missing");
    let field = column.sort_field();

    let indicator = move || {
        let direction = field.and_then(|field| screener.0.with(|state| state.sort().direction_for(field)));
        match direction {
            Some(SortDirection::Ascending) => " ▲",
            Some(SortDirection::Descending) => " ▼",
            None => "",
        }
    };

    view! {
        <th
            class:sortable=field.is_some()
            on:click=move |_| {
                if let Some(field) = field {
                    screener.0.update(|state| state.toggle_sort(field));
                }
            }
        >
            {column.label()}
            {indicator}
        </th>
    }
}

#[component]
fn ColumnPicker() -> impl IntoView {
    let screener = use_context::<ScreenerSignal>().expect("screener context missing");

    view! {
        <details class="column-picker">
            <summary>"Columns"</summary>
            <For
                each=move || Column::ALL.into_iter()
                key=|column| *column
                children=move |column: Column| {
                    view! {
                        <label class="column-picker__option">
                            <input
                                type="checkbox"
                                prop:checked=move || screener.0.with(|state| state.is_column_visible(column))
                                on:change=move |_| {
                                    screener.0.update(|state| {
                                        if let Err(err) = state.toggle_column(column) {
                                            log::warn!("column visibility not saved: {err}");
                                        }
                                    });
                                }
                            />
                            <span>{column.label()}</span>
                        </label>
                    }
                }
            />
        </details>
    }
}
