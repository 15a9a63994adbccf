//! Training panel of the assistant page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Edits a [`TrainingDraft`] of rules and configuration and writes it back
//! through the `AssistantsState` context on "Guardar". The analysis and
//! context tabs browse the per-assistant insights store; collaborators have
//! their own tab component.

use leptos::prelude::*;

use crate::components::collaborators_tab::CollaboratorsTab;
use crate::components::integration_dialog::IntegrationDialog;
use crate::state::assistant::{Assistant, Channel, LeadCategory, Objective, TrainingConfig};
use crate::state::assistants::AssistantsState;
use crate::state::chat::ChatRole;
use crate::state::collaborators::CollaboratorsState;
use crate::state::insights::{ConversationContext, FileAnalysis, InsightsState, Sentiment};
use crate::state::integrations::{Integration, IntegrationDraft, IntegrationKind};
use crate::state::training::{SAVE_DELAY, TrainingDraft, TrainingTab};
use crate::state::ui::{Alert, UiState};
use crate::util::storage::BrowserStorage;
use crate::util::timer::after;

const KIND_ORDER: [IntegrationKind; 5] = [
    IntegrationKind::Messaging,
    IntegrationKind::Ads,
    IntegrationKind::Crm,
    IntegrationKind::Analytics,
    IntegrationKind::Automation,
];

fn objective_label(objective: Objective) -> &'static str {
    match objective {
        Objective::LeadGen => "Leads",
        other => other.label(),
    }
}

fn lead_option(lead: LeadCategory) -> String {
    let icon = match lead {
        LeadCategory::Hot => "🔥 ",
        LeadCategory::Warm => "🌡️ ",
        LeadCategory::Cold => "❄️ ",
        LeadCategory::Todos => "",
    };
    format!("{icon}{}", lead.label())
}

fn sentiment_icon(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "🙂",
        Sentiment::Neutral => "😐",
        Sentiment::Negative => "🙁",
    }
}

fn lead_score_class(score: u8) -> &'static str {
    match score {
        70.. => "badge badge--score-high",
        40..=69 => "badge badge--score-mid",
        _ => "badge badge--score-low",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_owned()
    }
}

fn edit_config(draft: RwSignal<TrainingDraft>, f: impl FnOnce(&mut TrainingConfig)) {
    draft.update(|d| f(&mut d.config));
}

#[component]
pub fn TrainingPanel(
    assistant: Assistant,
    insights: RwSignal<InsightsState>,
    collaborators: RwSignal<CollaboratorsState>,
) -> impl IntoView {
    let assistants = expect_context::<RwSignal<AssistantsState>>();
    let ui = expect_context::<RwSignal<UiState>>();

    let draft = RwSignal::new(TrainingDraft::new(&assistant));
    let tab = RwSignal::new(TrainingTab::default());
    let integration = RwSignal::new(None::<IntegrationDraft>);

    let id = assistant.id.clone();
    Effect::new(move |_| {
        if let Some(current) = assistants.with(|repo| repo.get(&id).cloned()) {
            draft.update(|d| d.sync(&current));
        }
    });

    let changed = move || draft.with(TrainingDraft::changed);
    let saving = move || draft.with(|d| d.saving);

    let on_save = move |_| {
        let mut started = false;
        draft.update(|d| started = d.begin_save());
        if !started {
            return;
        }
        after(SAVE_DELAY, move || {
            let mut working = draft.get_untracked();
            let mut result = Ok(());
            assistants.update(|repo| result = working.commit(repo, &BrowserStorage));
            draft.set(working);
            let alert = match result {
                Ok(()) => Alert::training_saved(),
                Err(e) => Alert::error("Error al guardar", &e),
            };
            ui.update(|u| u.show_alert(alert));
        });
    };

    let on_integration_saved = Callback::new(move |updated: Integration| {
        draft.update(|d| d.update_integration(updated));
    });

    let badge = move |t: TrainingTab| match t {
        TrainingTab::Analysis => insights.with(|i| i.analyses().len()),
        TrainingTab::Context => insights.with(|i| i.contexts().len()),
        _ => 0,
    };

    let tabs = TrainingTab::ALL
        .into_iter()
        .map(|t| {
            view! {
                <button
                    class="training-panel__tab"
                    class:training-panel__tab--active=move || tab.get() == t
                    on:click=move |_| tab.set(t)
                >
                    {t.label()}
                    {move || {
                        let count = badge(t);
                        (count > 0).then(|| view! { <span class="training-panel__badge">{count}</span> })
                    }}
                </button>
            }
        })
        .collect::<Vec<_>>();

    let assistant_id = assistant.id.clone();
    let assistant_name = assistant.name.clone();
    let body = move || match tab.get() {
        TrainingTab::Config => view! { <ConfigTab draft=draft integration=integration/> }.into_any(),
        TrainingTab::Rules => view! { <RulesTab draft=draft/> }.into_any(),
        TrainingTab::Analysis => view! { <AnalysisTab insights=insights/> }.into_any(),
        TrainingTab::Context => view! { <ContextTab insights=insights/> }.into_any(),
        TrainingTab::Collaborators => {
            view! {
                <CollaboratorsTab
                    collaborators=collaborators
                    assistant_id=assistant_id.clone()
                    assistant_name=assistant_name.clone()
                />
            }
                .into_any()
        }
    };

    view! {
        <section class="training-panel">
            <header class="training-panel__header">
                <div>
                    <h3>"Configuración"</h3>
                    <p class="panel-section__hint">"Entrenamiento del asistente"</p>
                </div>
                <Show when=changed>
                    <span class="badge badge--unsaved">"Sin guardar"</span>
                </Show>
            </header>

            <nav class="training-panel__tabs">{tabs}</nav>

            <div class="training-panel__body">{body}</div>

            <footer class="training-panel__footer">
                <button
                    class="btn"
                    class:btn--primary=changed
                    disabled=move || saving() || !changed()
                    on:click=on_save
                >
                    {move || {
                        if saving() {
                            "Guardando..."
                        } else if changed() {
                            "Guardar"
                        } else {
                            "OK"
                        }
                    }}
                </button>
            </footer>

            <IntegrationDialog draft=integration on_save=on_integration_saved/>
        </section>
    }
}

#[component]
fn ConfigTab(draft: RwSignal<TrainingDraft>, integration: RwSignal<Option<IntegrationDraft>>) -> impl IntoView {
    let config = move || draft.with(|d| d.config.clone());

    let objectives = Objective::ALL
        .into_iter()
        .map(|o| {
            view! {
                <button
                    class="chip"
                    class:chip--active=move || draft.with(|d| d.config.objective == o)
                    on:click=move |_| edit_config(draft, |c| c.objective = o)
                >
                    {objective_label(o)}
                </button>
            }
        })
        .collect::<Vec<_>>();

    let flag = move |label: &'static str, get: fn(&TrainingConfig) -> bool, set: fn(&mut TrainingConfig, bool)| {
        view! {
            <label class="checkbox-field">
                <input
                    type="checkbox"
                    prop:checked=move || draft.with(|d| get(&d.config))
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        edit_config(draft, |c| set(c, checked));
                    }
                />
                {label}
            </label>
        }
    };

    let groups = move || {
        let integrations = config().integrations;
        KIND_ORDER
            .into_iter()
            .filter_map(|kind| {
                let members: Vec<Integration> = integrations.iter().filter(|i| i.kind == kind).cloned().collect();
                (!members.is_empty()).then(|| {
                    view! {
                        <div class="integration-group">
                            <p class="integration-group__title">{kind.label()}</p>
                            <div class="integration-group__items">
                                {members
                                    .into_iter()
                                    .map(|i| {
                                        let connected = i.connected;
                                        let name = i.name.clone();
                                        view! {
                                            <button
                                                class="integration-chip"
                                                class:integration-chip--connected=connected
                                                on:click=move |_| integration.set(Some(IntegrationDraft::open(&i)))
                                            >
                                                {name}
                                                {if connected { " ✓" } else { " ⚙" }}
                                            </button>
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </div>
                        </div>
                    }
                })
            })
            .collect::<Vec<_>>()
    };

    view! {
        <div class="config-tab">
            <div class="panel-section">
                <span class="form-field__label">"Objetivo"</span>
                <div class="chip-row">{objectives}</div>
            </div>

            <div class="config-tab__selects">
                <label class="form-field">
                    <span class="form-field__label">"Lead"</span>
                    <select
                        class="input"
                        prop:value=move || draft.with(|d| d.config.lead_category.label().to_owned())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            if let Some(lead) = LeadCategory::ALL.into_iter().find(|l| l.label() == value) {
                                edit_config(draft, |c| c.lead_category = lead);
                            }
                        }
                    >
                        {LeadCategory::ALL
                            .into_iter()
                            .map(|l| view! { <option value=l.label()>{lead_option(l)}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
                <label class="form-field">
                    <span class="form-field__label">"Canal"</span>
                    <select
                        class="input"
                        prop:value=move || draft.with(|d| d.config.channel.label().to_owned())
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            if let Some(channel) = Channel::ALL.into_iter().find(|c| c.label() == value) {
                                edit_config(draft, |c| c.channel = channel);
                            }
                        }
                    >
                        {Channel::ALL
                            .into_iter()
                            .map(|c| view! { <option value=c.label()>{c.label()}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
            </div>

            <div class="config-tab__flags">
                {flag("Escalado", |c| c.auto_escalate, |c, v| c.auto_escalate = v)}
                {flag("Citas", |c| c.schedule_enabled, |c, v| c.schedule_enabled = v)}
                {flag("Sentimiento", |c| c.sentiment_analysis, |c, v| c.sentiment_analysis = v)}
                {flag("Recomend.", |c| c.product_recommendations, |c, v| c.product_recommendations = v)}
            </div>

            <div class="panel-section">
                <div class="panel-section__row">
                    <span class="form-field__label">"Integraciones"</span>
                    <span class="badge">
                        {move || format!("{} conectadas", draft.with(TrainingDraft::connected_count))}
                    </span>
                </div>
                {groups}
            </div>
        </div>
    }
}

#[component]
fn RulesTab(draft: RwSignal<TrainingDraft>) -> impl IntoView {
    view! {
        <div class="rules-tab">
            <label class="form-field">
                <span class="form-field__label">"Instrucciones"</span>
                <textarea
                    class="input input--area"
                    rows="8"
                    placeholder="Reglas..."
                    prop:value=move || draft.with(|d| d.rules.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.rules = value);
                    }
                ></textarea>
            </label>
            <label class="form-field">
                <span class="form-field__label">"Prompt"</span>
                <textarea
                    class="input input--area"
                    rows="4"
                    placeholder="Prompt base..."
                    prop:value=move || draft.with(|d| d.config.custom_prompt.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit_config(draft, |c| c.custom_prompt = value);
                    }
                ></textarea>
            </label>
        </div>
    }
}

#[component]
fn AnalysisTab(insights: RwSignal<InsightsState>) -> impl IntoView {
    let selected = RwSignal::new(None::<String>);
    let count = move || insights.with(|i| i.analyses().len());

    let on_clear = move |_| {
        insights.update(|i| {
            if let Err(e) = i.clear_analyses(&BrowserStorage) {
                log::warn!("could not clear analyses: {e}");
            }
        });
    };

    let row = move |analysis: FileAnalysis| {
        let id = analysis.id.clone();
        let toggle_id = id.clone();
        let is_open = move || selected.with(|s| s.as_deref() == Some(id.as_str()));
        let details = analysis.clone();
        view! {
            <li
                class="insight-row"
                class:insight-row--open=is_open.clone()
                on:click=move |_| {
                    let target = toggle_id.clone();
                    selected.update(|s| *s = if s.as_deref() == Some(target.as_str()) { None } else { Some(target) });
                }
            >
                <div class="insight-row__summary">
                    <span>{analysis.file_type.icon()}</span>
                    <div>
                        <p class="insight-row__title">{analysis.file_name.clone()}</p>
                        <p class="panel-section__hint">{analysis.analyzed_at.format("%d/%m/%Y").to_string()}</p>
                    </div>
                    {analysis.sentiment.map(|s| view! { <span title=s.label()>{sentiment_icon(s)}</span> })}
                    <button
                        class="btn btn--icon"
                        aria-label="Eliminar análisis"
                        on:click={
                            let id = analysis.id.clone();
                            move |ev: leptos::ev::MouseEvent| {
                                ev.stop_propagation();
                                insights.update(|i| {
                                    if let Err(e) = i.delete_analysis(&BrowserStorage, &id) {
                                        log::warn!("could not delete analysis {id}: {e}");
                                    }
                                });
                            }
                        }
                    >
                        "🗑"
                    </button>
                </div>
                <Show when=is_open.clone()>
                    <AnalysisDetails analysis=details.clone()/>
                </Show>
            </li>
        }
    };

    view! {
        <div class="analysis-tab">
            <div class="panel-section__row">
                <div>
                    <h4 class="panel-section__title">"Análisis de Archivos"</h4>
                    <p class="panel-section__hint">{move || format!("{} archivos analizados", count())}</p>
                </div>
                <Show when=move || { count() > 0 }>
                    <button class="btn btn--ghost" on:click=on_clear>"Limpiar"</button>
                </Show>
            </div>
            <Show
                when=move || { count() > 0 }
                fallback=|| {
                    view! {
                        <div class="panel-empty">
                            <p>"No hay archivos analizados"</p>
                            <p class="panel-section__hint">"Sube archivos en el chat para ver su análisis aquí"</p>
                        </div>
                    }
                }
            >
                <ul class="insight-list">
                    {move || insights.with(|i| i.analyses().to_vec()).into_iter().map(row).collect::<Vec<_>>()}
                </ul>
            </Show>
        </div>
    }
}

#[component]
fn AnalysisDetails(analysis: FileAnalysis) -> impl IntoView {
    let mut stats = Vec::new();
    if let Some(words) = analysis.word_count {
        stats.push(format!("📝 {words} palabras"));
    }
    if let Some(pages) = analysis.page_count {
        stats.push(format!("📄 {pages} páginas"));
    }
    if let Some(duration) = &analysis.duration {
        stats.push(format!("⏱️ {duration}"));
    }
    if let Some(d) = analysis.dimensions {
        stats.push(format!("📐 {}x{}", d.width, d.height));
    }

    view! {
        <div class="insight-details">
            <p class="insight-details__label">"Resumen"</p>
            <p>{analysis.summary}</p>
            {(!analysis.key_points.is_empty())
                .then(|| {
                    view! {
                        <p class="insight-details__label">"Puntos Clave"</p>
                        <ul class="insight-details__points">
                            {analysis.key_points.into_iter().map(|p| view! { <li>{p}</li> }).collect::<Vec<_>>()}
                        </ul>
                    }
                })}
            {(!analysis.entities.is_empty())
                .then(|| {
                    view! {
                        <p class="insight-details__label">"Entidades"</p>
                        <div class="chip-row">
                            {analysis
                                .entities
                                .into_iter()
                                .map(|e| view! { <span class="chip">{format!("{}: {}", e.kind, e.value)}</span> })
                                .collect::<Vec<_>>()}
                        </div>
                    }
                })}
            <div class="insight-details__stats">
                {stats.into_iter().map(|s| view! { <span>{s}</span> }).collect::<Vec<_>>()}
            </div>
        </div>
    }
}

#[component]
fn ContextTab(insights: RwSignal<InsightsState>) -> impl IntoView {
    let selected = RwSignal::new(None::<String>);
    let count = move || insights.with(|i| i.contexts().len());

    let on_clear = move |_| {
        insights.update(|i| {
            if let Err(e) = i.clear_contexts(&BrowserStorage) {
                log::warn!("could not clear contexts: {e}");
            }
        });
    };

    let row = move |ctx: ConversationContext| {
        let id = ctx.id.clone();
        let toggle_id = id.clone();
        let delete_id = id.clone();
        let is_open = move || selected.with(|s| s.as_deref() == Some(id.as_str()));
        let hidden_topics = ctx.topics.len().saturating_sub(3);
        let details = ctx.clone();
        view! {
            <li
                class="insight-row"
                class:insight-row--open=is_open.clone()
                on:click=move |_| {
                    let target = toggle_id.clone();
                    selected.update(|s| *s = if s.as_deref() == Some(target.as_str()) { None } else { Some(target) });
                }
            >
                <div class="insight-row__summary">
                    <div>
                        <p class="insight-row__title">{format!("{} mensajes", ctx.messages.len())}</p>
                        <p class="panel-section__hint">{ctx.created_at.format("%d/%m/%Y %H:%M").to_string()}</p>
                    </div>
                    {ctx.lead_score.map(|score| view! { <span class=lead_score_class(score)>{format!("{score}%")}</span> })}
                    <span title=ctx.sentiment.label()>{sentiment_icon(ctx.sentiment)}</span>
                    <button
                        class="btn btn--icon"
                        aria-label="Eliminar conversación"
                        on:click=move |ev: leptos::ev::MouseEvent| {
                            ev.stop_propagation();
                            insights.update(|i| {
                                if let Err(e) = i.delete_context(&BrowserStorage, &delete_id) {
                                    log::warn!("could not delete context {delete_id}: {e}");
                                }
                            });
                        }
                    >
                        "🗑"
                    </button>
                </div>
                <div class="chip-row">
                    {ctx.topics.iter().take(3).map(|t| view! { <span class="chip">{t.clone()}</span> }).collect::<Vec<_>>()}
                    {(hidden_topics > 0).then(|| view! { <span class="chip">{format!("+{hidden_topics}")}</span> })}
                </div>
                <Show when=is_open.clone()>
                    <ContextDetails context=details.clone()/>
                </Show>
            </li>
        }
    };

    view! {
        <div class="context-tab">
            <div class="panel-section__row">
                <div>
                    <h4 class="panel-section__title">"Historial de Conversaciones"</h4>
                    <p class="panel-section__hint">{move || format!("{} conversaciones guardadas", count())}</p>
                </div>
                <Show when=move || { count() > 0 }>
                    <button class="btn btn--ghost" on:click=on_clear>"Limpiar"</button>
                </Show>
            </div>
            <Show
                when=move || { count() > 0 }
                fallback=|| {
                    view! {
                        <div class="panel-empty">
                            <p>"No hay conversaciones guardadas"</p>
                            <p class="panel-section__hint">"Guarda una conversación desde el chat de prueba"</p>
                        </div>
                    }
                }
            >
                <ul class="insight-list">
                    {move || insights.with(|i| i.contexts().to_vec()).into_iter().map(row).collect::<Vec<_>>()}
                </ul>
            </Show>
        </div>
    }
}

#[component]
fn ContextDetails(context: ConversationContext) -> impl IntoView {
    view! {
        <div class="insight-details">
            <p class="insight-details__label">"Conversación"</p>
            <ul class="insight-details__messages">
                {context
                    .messages
                    .iter()
                    .map(|m| {
                        let who = if m.role == ChatRole::User { "👤" } else { "🤖" };
                        view! { <li>{who} " " {truncate(&m.content, 100)}</li> }
                    })
                    .collect::<Vec<_>>()}
            </ul>
            {(!context.file_analyses.is_empty())
                .then(|| {
                    view! {
                        <p class="insight-details__label">
                            {format!("Archivos analizados ({})", context.file_analyses.len())}
                        </p>
                        <div class="chip-row">
                            {context
                                .file_analyses
                                .iter()
                                .map(|fa| view! { <span class="chip">{fa.file_type.icon()} " " {truncate(&fa.file_name, 15)}</span> })
                                .collect::<Vec<_>>()}
                        </div>
                    }
                })}
            {context
                .summary
                .map(|summary| {
                    view! {
                        <p class="insight-details__label">"Resumen"</p>
                        <p>{summary}</p>
                    }
                })}
        </div>
    }
}
