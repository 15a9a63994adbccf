//! List page: landing hero, assistant search, create / edit / delete.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root route. Mutations go through the `AssistantsState` context and
//! every outcome is reported with the shared alert dialog.

use leptos::prelude::*;

use crate::components::alert_modal::AlertModal;
use crate::components::assistant_card::AssistantCard;
use crate::components::assistant_modal::AssistantModal;
use crate::state::assistant::Assistant;
use crate::state::assistant_form::{AssistantForm, SaveFormError, save_form};
use crate::state::assistants::AssistantsState;
use crate::state::ui::{Alert, UiState, assistant_count_label};
use crate::util::storage::BrowserStorage;

#[component]
pub fn HomePage() -> impl IntoView {
    let assistants = expect_context::<RwSignal<AssistantsState>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let form = RwSignal::new(None::<AssistantForm>);

    let on_start = move |_| {
        ui.update(|u| {
            if let Err(e) = u.start(&BrowserStorage) {
                log::warn!("could not remember landing visit: {e}");
            }
        });
    };
    let on_back_to_landing = move |_| {
        ui.update(|u| {
            if let Err(e) = u.back_to_landing(&BrowserStorage) {
                log::warn!("could not reset landing flag: {e}");
            }
        });
    };

    let on_create = move |_| form.set(Some(AssistantForm::create()));
    let on_edit = Callback::new(move |assistant: Assistant| form.set(Some(AssistantForm::edit(&assistant))));

    let on_save = Callback::new(move |mut finished: AssistantForm| {
        let editing = finished.is_editing();
        let name = finished.name.trim().to_owned();
        let mut outcome = None;
        assistants.update(|repo| outcome = Some(save_form(&mut finished, repo, &BrowserStorage)));
        let alert = match outcome {
            Some(Ok(id)) if editing => Alert::updated(&name, &id),
            Some(Ok(id)) => Alert::created(&name, &id),
            Some(Err(SaveFormError::Invalid(errors))) => {
                // Validation already gates the save button; keep the dialog open.
                log::warn!("assistant form rejected on save: {errors:?}");
                form.update(|f| {
                    if let Some(f) = f {
                        f.saving = false;
                    }
                });
                return;
            }
            Some(Err(e)) => Alert::error("Error al guardar", &e),
            None => return,
        };
        form.set(None);
        ui.update(|u| u.show_alert(alert));
    });

    let on_delete = Callback::new(move |id: String| {
        let name = assistants.with_untracked(|repo| repo.get(&id).map(|a| a.name.clone()));
        let mut result = Ok(());
        assistants.update(|repo| result = repo.delete(&BrowserStorage, &id));
        let alert = match result {
            Ok(()) => Alert::deleted(name.as_deref()),
            Err(e) => Alert::error("Error al eliminar", &e),
        };
        ui.update(|u| u.show_alert(alert));
    });

    let visible = move || {
        let query = ui.with(|u| u.search_query.clone());
        assistants.with(|repo| repo.search(&query).into_iter().cloned().collect::<Vec<_>>())
    };
    let total = move || assistants.with(|repo| repo.items().len());

    view! {
        <Show
            when=move || !ui.with(|u| u.show_landing)
            fallback=move || view! { <LandingHero on_start=Callback::new(on_start)/> }
        >
            <Show
                when=move || assistants.with(AssistantsState::loaded)
                fallback=|| view! { <p class="home-page__loading">"Cargando asistentes..."</p> }
            >
                <div class="home-page">
                    <header class="toolbar">
                        <span class="toolbar__title">"Automatizaciones con IA"</span>
                        <span class="toolbar__spacer"></span>
                        <button class="btn btn--ghost" on:click=on_back_to_landing>"Inicio"</button>
                    </header>

                    <main class="home-page__main">
                        <div class="home-page__heading">
                            <div>
                                <h2>"Mis Asistentes"</h2>
                                <p class="home-page__subtitle">{move || assistant_count_label(total())}</p>
                            </div>
                            <Show when=move || { total() > 0 }>
                                <button class="btn btn--primary" on:click=on_create>"+ Crear Asistente"</button>
                            </Show>
                        </div>

                        <Show when=move || { total() > 0 }>
                            <div class="home-page__search">
                                <input
                                    class="input"
                                    type="text"
                                    placeholder="Buscar automatización..."
                                    prop:value=move || ui.with(|u| u.search_query.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        ui.update(|u| u.search_query = value);
                                    }
                                />
                                {move || {
                                    ui.with(|u| u.no_results_message(visible().len()))
                                        .map(|msg| view! { <p class="home-page__empty-search">{msg}</p> })
                                }}
                            </div>
                        </Show>

                        <Show
                            when=move || { total() > 0 }
                            fallback=move || view! { <EmptyState on_create=Callback::new(on_create)/> }
                        >
                            <div class="home-page__grid">
                                {move || {
                                    visible()
                                        .into_iter()
                                        .map(|assistant| {
                                            view! { <AssistantCard assistant=assistant on_edit=on_edit on_delete=on_delete/> }
                                        })
                                        .collect::<Vec<_>>()
                                }}
                            </div>
                        </Show>
                    </main>
                </div>
            </Show>
        </Show>

        <AssistantModal form=form on_save=on_save/>
        <AlertModal/>
    }
}

#[component]
fn LandingHero(on_start: Callback<leptos::ev::MouseEvent>) -> impl IntoView {
    view! {
        <section class="landing">
            <h1 class="landing__brand">"Funnelhot"</h1>
            <p class="landing__tagline">"Automatizaciones simples con IA"</p>
            <ul class="landing__features">
                <li>"Asistentes IA · Ventas y soporte"</li>
                <li>"Automatización · Flujos 24/7"</li>
                <li>"Conversiones · Leads calificados"</li>
            </ul>
            <button class="btn btn--primary landing__start" on:click=move |ev| on_start.run(ev)>
                "Comenzar"
            </button>
        </section>
    }
}

#[component]
fn EmptyState(on_create: Callback<leptos::ev::MouseEvent>) -> impl IntoView {
    view! {
        <div class="empty-state">
            <h3>"No hay asistentes"</h3>
            <p>
                "Crea tu primer asistente de IA para comenzar. Podrás configurar su idioma, tono y entrenarlo con reglas personalizadas."
            </p>
            <button class="btn btn--primary" on:click=move |ev| on_create.run(ev)>
                "Crear primer asistente"
            </button>
        </div>
    }
}
