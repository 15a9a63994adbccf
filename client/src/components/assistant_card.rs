//! Card for one assistant on the list page, with edit / train / delete actions.

use std::time::Duration;

use leptos::prelude::*;

use crate::state::assistant::{Assistant, Language};
use crate::util::timer::after;

const DELETE_DELAY: Duration = Duration::from_millis(300);

fn flag(language: Language) -> &'static str {
    match language {
        Language::Spanish => "🇪🇸",
        Language::English => "🇬🇧",
        Language::Portuguese => "🇧🇷",
    }
}

#[component]
pub fn AssistantCard(assistant: Assistant, on_edit: Callback<Assistant>, on_delete: Callback<String>) -> impl IntoView {
    let href = format!("/{}", assistant.id);
    let confirm_delete = RwSignal::new(false);
    let deleting = RwSignal::new(false);
    let menu_open = RwSignal::new(false);

    let lengths = assistant.response_length;
    let tone_class = format!("badge badge--tone-{}", assistant.tone.label().to_lowercase());
    let audio_label = if assistant.audio_enabled { "Audio habilitado" } else { "Sin audio" };

    let edit_target = assistant.clone();
    let on_edit_click = move |_| {
        menu_open.set(false);
        on_edit.run(edit_target.clone());
    };

    let delete_id = assistant.id.clone();
    let on_confirm_delete = move |_| {
        if deleting.get_untracked() {
            return;
        }
        deleting.set(true);
        let id = delete_id.clone();
        after(DELETE_DELAY, move || {
            on_delete.run(id);
            deleting.set(false);
            confirm_delete.set(false);
        });
    };

    let name = assistant.name.clone();
    view! {
        <div class="assistant-card">
            <div class="assistant-card__header">
                <h3 class="assistant-card__name">{assistant.name.clone()}</h3>
                <button
                    class="btn btn--icon assistant-card__menu-toggle"
                    on:click=move |_| menu_open.update(|v| *v = !*v)
                    aria-label="Abrir menú"
                >
                    "⋮"
                </button>
                <Show when=move || menu_open.get()>
                    <div class="assistant-card__menu">
                        <button class="assistant-card__menu-item" on:click=on_edit_click.clone()>
                            "Editar"
                        </button>
                        <a class="assistant-card__menu-item" href=href.clone()>
                            "Entrenar"
                        </a>
                        <button
                            class="assistant-card__menu-item assistant-card__menu-item--danger"
                            on:click=move |_| {
                                menu_open.set(false);
                                confirm_delete.set(true);
                            }
                        >
                            "Eliminar"
                        </button>
                    </div>
                </Show>
            </div>

            <div class="assistant-card__badges">
                <span class="badge">{flag(assistant.language)} " " {assistant.language.label()}</span>
                <span class=tone_class>{assistant.tone.label()}</span>
            </div>

            <p class="assistant-card__audio" class:assistant-card__audio--on=assistant.audio_enabled>
                {audio_label}
            </p>

            <div class="assistant-card__distribution">
                <p class="assistant-card__caption">"Distribución de respuestas"</p>
                <div class="length-bar">
                    <span class="length-bar__short" style=format!("width: {}%", lengths.short)></span>
                    <span class="length-bar__medium" style=format!("width: {}%", lengths.medium)></span>
                    <span class="length-bar__long" style=format!("width: {}%", lengths.long)></span>
                </div>
                <div class="length-bar__legend">
                    <span>{format!("Corta {}%", lengths.short)}</span>
                    <span>{format!("Media {}%", lengths.medium)}</span>
                    <span>{format!("Larga {}%", lengths.long)}</span>
                </div>
            </div>

            <a class="btn btn--outline assistant-card__train" href=format!("/{}", assistant.id)>
                "Entrenar asistente"
            </a>

            <Show when=move || confirm_delete.get()>
                <div class="dialog-backdrop">
                    <div class="dialog" role="alertdialog">
                        <h2 class="dialog__title">"¿Eliminar asistente?"</h2>
                        <p class="dialog__body">
                            "Esta acción no se puede deshacer. Se eliminará permanentemente el asistente \""
                            {name.clone()}
                            "\" y toda su configuración."
                        </p>
                        <div class="dialog__actions">
                            <button
                                class="btn"
                                disabled=move || deleting.get()
                                on:click=move |_| confirm_delete.set(false)
                            >
                                "Cancelar"
                            </button>
                            <button
                                class="btn btn--danger"
                                disabled=move || deleting.get()
                                on:click=on_confirm_delete.clone()
                            >
                                {move || if deleting.get() { "Eliminando..." } else { "Eliminar" }}
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
