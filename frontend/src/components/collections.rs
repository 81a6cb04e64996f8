use leptos::{ev, event_target_value, *};
use stock_screener::{Collection, CollectionError};

use super::dashboard::{CollectionsSignal, SelectedSymbolSignal};

#[component]
pub fn CollectionsPanel() -> impl IntoView {
    let collections = use_context::<CollectionsSignal>().expect("collections context missing");
    let selected_symbol =
        use_context::<SelectedSymbolSignal>().expect("selected symbol context missing");

    let new_name = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);

    let report = move |result: Option<Result<(), CollectionError>>| match result {
        Some(Err(err)) => {
            log::warn!("collection update rejected: {err}");
            error.set(Some(err.to_string()));
        }
        _ => error.set(None),
    };

    let on_create = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get_untracked();
        let result = collections
            .0
            .try_update(|store| store.create(&name).map(|_| ()));
        if matches!(result, Some(Ok(()))) {
            new_name.set(String::new());
        }
        report(result);
    };

    let list = create_memo(move |_| collections.0.with(|store| store.list().to_vec()));

    view! {
        <section class="collections-panel">
            <h2>"Collections"</h2>
            <form class="collections-panel__create" on:submit=on_create>
                <input
                    type="text"
                    placeholder="New collection"
                    prop:value=move || new_name.get()
                    on:input=move |ev| new_name.set(event_target_value(&ev))
                />
                <button type="submit">"Create"</button>
            </form>
            <Show when=move || error.with(Option::is_some)>
                <p class="collections-panel__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <p class="collections-panel__selected">
                {move || match selected_symbol.0.get() {
                    Some(symbol) => format!("Selected: {symbol}"),
                    None => "Select a row to add it to a collection".to_string(),
                }}
            </p>
            <Show
                when=move || list.with(|list| !list.is_empty())
                fallback=|| view! { <p class="collections-panel__empty">"No collections yet"</p> }
            >
                <For
                    each=move || list.get()
                    key=|collection| collection.clone()
                    children=move |collection: Collection| {
                        view! { <CollectionCard collection=collection on_result=report /> }
                    }
                />
            </Show>
        </section>
    }
}

#[component]
fn CollectionCard<F>(collection: Collection, on_result: F) -> impl IntoView
where
    F: Fn(Option<Result<(), CollectionError>>) + Copy + 'static,
{
    let collections = use_context::<CollectionsSignal>().expect("collections context missing");
    let selected_symbol =
        use_context::<SelectedSymbolSignal>().expect("selected symbol context missing");

    let name = store_value(collection.name.clone());

    let add_selected = move |_| {
        let Some(symbol) = selected_symbol.0.get_untracked() else {
            return;
        };
        let result = collections
            .0
            .try_update(|store| name.with_value(|name| store.add_symbol(name, &symbol).map(|_| ())));
        on_result(result);
    };

    let delete = move |_| {
        let result = collections
            .0
            .try_update(|store| name.with_value(|name| store.delete(name).map(|_| ())));
        on_result(result);
    };

    let symbols = collection.symbols.clone();

    view! {
        <article class="collection-card">
            <header class="collection-card__header">
                <h3>{collection.name}</h3>
                <button
                    disabled=move || selected_symbol.0.with(Option::is_none)
                    on:click=add_selected
                >
                    "Add selected"
                </button>
                <button class="collection-card__delete" on:click=delete>
                    "Delete"
                </button>
            </header>
            <ul class="collection-card__symbols">
                {symbols
                    .into_iter()
                    .map(|symbol| {
                        let target = symbol.clone();
                        view! {
                            <li>
                                <span>{symbol}</span>
                                <button
                                    class="collection-card__remove"
                                    on:click=move |_| {
                                        let result = collections.0.try_update(|store| {
                                            name.with_value(|name| store.remove_symbol(name, &target).map(|_| ()))
                                        });
                                        on_result(result);
                                    }
                                >
                                    "×"
                                </button>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </article>
    }
}
