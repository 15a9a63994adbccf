//! Training page for one assistant (`/:id`).
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the per-assistant insights and collaborator stores, hydrated once
//! mounted, and hands them to the training panel and the test chat. The
//! chat's analyses and saved contexts flow back through callbacks.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::alert_modal::AlertModal;
use crate::components::chat_panel::ChatPanel;
use crate::components::training_panel::TrainingPanel;
use crate::state::assistant::Assistant;
use crate::state::assistants::AssistantsState;
use crate::state::collaborators::CollaboratorsState;
use crate::state::insights::{ConversationContext, FileAnalysis, InsightsState};
use crate::util::storage::BrowserStorage;

#[component]
pub fn AssistantPage() -> impl IntoView {
    let assistants = expect_context::<RwSignal<AssistantsState>>();
    let params = use_params_map();
    let id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));
    let loaded = Memo::new(move |_| assistants.with(AssistantsState::loaded));
    let exists = Memo::new(move |_| assistants.with(|repo| repo.get(&id.get()).is_some()));

    // Re-render only when the route target appears or disappears, so saving
    // the training config does not reset the chat.
    let body = move || {
        if !loaded.get() {
            return view! {
                <div class="page-status">
                    <p>"Cargando asistente..."</p>
                </div>
            }
            .into_any();
        }
        let current = id.get();
        match exists.get().then(|| assistants.with_untracked(|repo| repo.get(&current).cloned())).flatten() {
            Some(assistant) => view! { <AssistantWorkspace assistant=assistant/> }.into_any(),
            None => view! { <AssistantNotFound/> }.into_any(),
        }
    };

    view! {
        <div class="assistant-page">
            <header class="toolbar">
                <a class="btn btn--ghost" href="/">"← Volver al listado"</a>
            </header>
            <main class="assistant-page__main">{body}</main>
            <AlertModal/>
        </div>
    }
}

#[component]
fn AssistantNotFound() -> impl IntoView {
    view! {
        <div class="page-status page-status--error">
            <h2>"Asistente no encontrado"</h2>
            <p>"El asistente que buscas no existe o ha sido eliminado. Verifica el ID o regresa al listado."</p>
            <a class="btn btn--outline" href="/">"Volver al listado"</a>
        </div>
    }
}

#[component]
fn AssistantWorkspace(assistant: Assistant) -> impl IntoView {
    let insights = RwSignal::new(InsightsState::new(&assistant.id));
    let collaborators = RwSignal::new(CollaboratorsState::new(&assistant.id));

    Effect::new(move |_| {
        insights.update(|i| i.hydrate(&BrowserStorage));
        collaborators.update(|c| c.hydrate(&BrowserStorage));
    });

    let on_analysis = Callback::new(move |analysis: FileAnalysis| {
        insights.update(|i| {
            if let Err(e) = i.add_analysis(&BrowserStorage, analysis) {
                log::warn!("could not store file analysis: {e}");
            }
        });
    });
    let on_context = Callback::new(move |context: ConversationContext| {
        insights.update(|i| {
            if let Err(e) = i.add_context(&BrowserStorage, context) {
                log::warn!("could not store conversation context: {e}");
            }
        });
    });

    view! {
        <AssistantHeader id=assistant.id.clone()/>
        <div class="assistant-page__columns">
            <TrainingPanel assistant=assistant.clone() insights=insights collaborators=collaborators/>
            <div class="assistant-page__chat">
                <div class="assistant-page__chat-heading">
                    <h3>"Chat de prueba"</h3>
                    <p class="panel-section__hint">"Prueba cómo responde tu asistente"</p>
                </div>
                <ChatPanel assistant=assistant on_analysis=on_analysis on_context=on_context/>
            </div>
        </div>
    }
}

/// Summary card that follows edits to the stored assistant.
#[component]
fn AssistantHeader(id: String) -> impl IntoView {
    let assistants = expect_context::<RwSignal<AssistantsState>>();
    let current = move || assistants.with(|repo| repo.get(&id).cloned());

    move || {
        current().map(|a| {
            let lengths = a.response_length;
            view! {
                <section class="assistant-header">
                    <div>
                        <h2 class="assistant-header__name">{a.name}</h2>
                        <div class="assistant-card__badges">
                            <span class="badge">{a.language.label()}</span>
                            <span class=format!("badge badge--tone-{}", a.tone.label().to_lowercase())>
                                {a.tone.label()}
                            </span>
                            <span class="badge">{if a.audio_enabled { "🔊 Audio habilitado" } else { "🔇 Sin audio" }}</span>
                        </div>
                    </div>
                    <div class="assistant-header__distribution">
                        <p class="assistant-card__caption">"Distribución de respuestas"</p>
                        <div class="length-bar__legend">
                            <span>{format!("Corta: {}%", lengths.short)}</span>
                            <span>{format!("Media: {}%", lengths.medium)}</span>
                            <span>{format!("Larga: {}%", lengths.long)}</span>
                        </div>
                    </div>
                </section>
            }
        })
    }
}
