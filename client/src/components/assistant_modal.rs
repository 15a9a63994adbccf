//! Two-step create / edit assistant dialog over [`AssistantForm`].

use leptos::prelude::*;

use crate::state::assistant::{Language, LengthSlot, Tone};
use crate::state::assistant_form::{AssistantForm, FormField, FormStep, SAVE_DELAY};
use crate::util::timer::after;

fn edit(form: RwSignal<Option<AssistantForm>>, f: impl FnOnce(&mut AssistantForm)) {
    form.update(|slot| {
        if let Some(form) = slot.as_mut() {
            f(form);
        }
    });
}

fn read<T>(form: RwSignal<Option<AssistantForm>>, f: impl FnOnce(&AssistantForm) -> T) -> Option<T> {
    form.with(|slot| slot.as_ref().map(f))
}

fn slot_label(slot: LengthSlot) -> &'static str {
    match slot {
        LengthSlot::Short => "Corta",
        LengthSlot::Medium => "Media",
        LengthSlot::Long => "Larga",
    }
}

fn language_option(language: Language) -> String {
    let flag = match language {
        Language::Spanish => "🇪🇸",
        Language::English => "🇬🇧",
        Language::Portuguese => "🇧🇷",
    };
    format!("{flag} {}", language.label())
}

/// Open while `form` holds a value; closing clears it. `on_save` receives the
/// finished form after the simulated save delay.
#[component]
pub fn AssistantModal(form: RwSignal<Option<AssistantForm>>, on_save: Callback<AssistantForm>) -> impl IntoView {
    let saving = move || read(form, |f| f.saving).unwrap_or(false);
    let step = move || read(form, |f| f.step).unwrap_or_default();
    let field_error = move |field: FormField| read(form, |f| f.field_error(field)).flatten();

    let close = move || {
        if !saving() {
            form.set(None);
        }
    };

    let on_save_click = move |_| {
        let mut started = false;
        edit(form, |f| started = f.begin_save());
        if !started {
            return;
        }
        after(SAVE_DELAY, move || {
            if let Some(finished) = form.get_untracked() {
                on_save.run(finished);
            }
        });
    };

    let basics = move || {
        view! {
            <div class="form-step">
                <label class="form-field">
                    <span class="form-field__label">"Nombre del asistente *"</span>
                    <input
                        class="input"
                        placeholder="Ej: Asistente de Ventas"
                        prop:value=move || read(form, |f| f.name.clone()).unwrap_or_default()
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit(form, |f| f.name = value);
                        }
                    />
                    <Show when=move || field_error(FormField::Name).is_some()>
                        <p class="form-field__error">{move || field_error(FormField::Name)}</p>
                    </Show>
                </label>

                <label class="form-field">
                    <span class="form-field__label">"Idioma *"</span>
                    <select
                        class="input"
                        prop:value=move || {
                            read(form, |f| f.language.map(|l| l.label().to_owned())).flatten().unwrap_or_default()
                        }
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            edit(form, |f| f.language = Language::from_label(&value));
                        }
                    >
                        <option value="" disabled=true>"Selecciona un idioma"</option>
                        {Language::ALL
                            .into_iter()
                            .map(|l| view! { <option value=l.label()>{language_option(l)}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                    <Show when=move || field_error(FormField::Language).is_some()>
                        <p class="form-field__error">{move || field_error(FormField::Language)}</p>
                    </Show>
                </label>

                <label class="form-field">
                    <span class="form-field__label">"Tono de comunicación *"</span>
                    <select
                        class="input"
                        prop:value=move || {
                            read(form, |f| f.tone.map(|t| t.label().to_owned())).flatten().unwrap_or_default()
                        }
                        on:change=move |ev| {
                            let value = event_target_value(&ev);
                            edit(form, |f| f.tone = Tone::from_label(&value));
                        }
                    >
                        <option value="" disabled=true>"Selecciona un tono"</option>
                        {Tone::ALL
                            .into_iter()
                            .map(|t| view! { <option value=t.label()>{t.label()}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                    <Show when=move || field_error(FormField::Tone).is_some()>
                        <p class="form-field__error">{move || field_error(FormField::Tone)}</p>
                    </Show>
                </label>
            </div>
        }
    };

    let distribution = move || {
        let total = move || read(form, |f| f.response_length.total()).unwrap_or_default();
        view! {
            <div class="form-step">
                <div class="form-step__row">
                    <span class="form-field__label">"Longitud de respuestas"</span>
                    <span class="total-badge" class:total-badge--bad=move || total() != 100>
                        {move || format!("Total: {}%", total())}
                    </span>
                </div>
                {LengthSlot::ORDER
                    .into_iter()
                    .map(|slot| {
                        let value = move || read(form, |f| f.response_length.get(slot)).unwrap_or_default();
                        view! {
                            <div class="slider-field">
                                <div class="slider-field__header">
                                    <span>{slot_label(slot)}</span>
                                    <span>{move || format!("{}%", value())}</span>
                                </div>
                                <input
                                    type="range"
                                    min="0"
                                    max="100"
                                    step="1"
                                    prop:value=move || value().to_string()
                                    on:input=move |ev| {
                                        if let Ok(v) = event_target_value(&ev).parse::<u32>() {
                                            edit(form, |f| f.set_length(slot, v));
                                        }
                                    }
                                />
                            </div>
                        }
                    })
                    .collect::<Vec<_>>()}
                <Show when=move || field_error(FormField::ResponseLength).is_some()>
                    <p class="form-field__error">{move || field_error(FormField::ResponseLength)}</p>
                </Show>
                <label class="checkbox-field">
                    <input
                        type="checkbox"
                        prop:checked=move || read(form, |f| f.audio_enabled).unwrap_or(false)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            edit(form, |f| f.audio_enabled = checked);
                        }
                    />
                    "Habilitar respuestas de audio"
                </label>
            </div>
        }
    };

    view! {
        <Show when=move || form.with(Option::is_some)>
            <div class="dialog-backdrop" on:click=move |_| close()>
                <div
                    class="dialog assistant-modal"
                    role="dialog"
                    on:click=|ev: leptos::ev::MouseEvent| ev.stop_propagation()
                >
                    <h2 class="dialog__title">{move || read(form, AssistantForm::title).unwrap_or_default()}</h2>

                    <div class="steps">
                        <span class="steps__item steps__item--active">
                            {move || if step() == FormStep::Distribution { "✓" } else { "1" }}
                            " Datos básicos"
                        </span>
                        <span class="steps__bar" class:steps__bar--done=move || step() == FormStep::Distribution></span>
                        <span class="steps__item" class:steps__item--active=move || step() == FormStep::Distribution>
                            "2 Configuración"
                        </span>
                    </div>

                    {move || match step() {
                        FormStep::Basics => basics().into_any(),
                        FormStep::Distribution => distribution().into_any(),
                    }}

                    <div class="dialog__actions">
                        {move || match step() {
                            FormStep::Basics => {
                                view! {
                                    <button class="btn btn--ghost" on:click=move |_| form.set(None)>
                                        "Cancelar"
                                    </button>
                                    <button
                                        class="btn btn--primary"
                                        on:click=move |_| edit(form, |f| {
                                            f.next();
                                        })
                                    >
                                        "Siguiente"
                                    </button>
                                }
                                    .into_any()
                            }
                            FormStep::Distribution => {
                                view! {
                                    <button
                                        class="btn btn--ghost"
                                        disabled=saving
                                        on:click=move |_| edit(form, AssistantForm::back)
                                    >
                                        "Atrás"
                                    </button>
                                    <button
                                        class="btn btn--primary"
                                        disabled=move || {
                                            saving() || read(form, |f| !f.distribution_errors().is_empty()).unwrap_or(true)
                                        }
                                        on:click=on_save_click
                                    >
                                        {move || if saving() { "Guardando..." } else { "Guardar" }}
                                    </button>
                                }
                                    .into_any()
                            }
                        }}
                    </div>
                </div>
            </div>
        </Show>
    }
}
