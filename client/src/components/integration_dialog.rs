//! Connect / disconnect dialog for one integration of the training config.

use leptos::prelude::*;

use crate::state::integrations::{CONNECT_DELAY, Integration, IntegrationDraft};
use crate::util::timer::after;

fn edit(draft: RwSignal<Option<IntegrationDraft>>, f: impl FnOnce(&mut IntegrationDraft)) {
    draft.update(|slot| {
        if let Some(d) = slot.as_mut() {
            f(d);
        }
    });
}

fn read<T>(draft: RwSignal<Option<IntegrationDraft>>, f: impl FnOnce(&IntegrationDraft) -> T) -> Option<T> {
    draft.with(|slot| slot.as_ref().map(f))
}

/// Open while `draft` holds a value. `on_save` receives the integration after a
/// successful connect or a disconnect; the dialog closes either way.
#[component]
pub fn IntegrationDialog(draft: RwSignal<Option<IntegrationDraft>>, on_save: Callback<Integration>) -> impl IntoView {
    let error = RwSignal::new(None::<String>);
    let connecting = move || read(draft, |d| d.connecting).unwrap_or(false);
    let connected = move || read(draft, |d| d.integration.connected).unwrap_or(false);

    let close = move || {
        if !connecting() {
            error.set(None);
            draft.set(None);
        }
    };

    let on_connect = move |_| {
        let mut outcome = Ok(());
        edit(draft, |d| outcome = d.begin_connect());
        if let Err(e) = outcome {
            error.set(Some(e.to_string()));
            return;
        }
        error.set(None);
        after(CONNECT_DELAY, move || {
            let mut finished = None;
            edit(draft, |d| finished = Some(d.finish_connect()));
            if let Some(integration) = finished {
                log::info!("connected integration {}", integration.id);
                on_save.run(integration);
                draft.set(None);
            }
        });
    };

    let on_disconnect = move |_| {
        if let Some(integration) = read(draft, IntegrationDraft::disconnect) {
            log::info!("disconnected integration {}", integration.id);
            on_save.run(integration);
            draft.set(None);
        }
    };

    let text_field = move |label: &'static str,
                           placeholder: &'static str,
                           kind: &'static str,
                           get: fn(&IntegrationDraft) -> String,
                           set: fn(&mut IntegrationDraft, String)| {
        view! {
            <label class="form-field">
                <span class="form-field__label">{label}</span>
                <input
                    class="input"
                    type=kind
                    placeholder=placeholder
                    disabled=connecting
                    prop:value=move || read(draft, get).unwrap_or_default()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit(draft, |d| set(d, value));
                    }
                />
            </label>
        }
    };

    view! {
        <Show when=move || draft.with(Option::is_some)>
            <div class="dialog-backdrop" on:click=move |_| close()>
                <div
                    class="dialog integration-dialog"
                    role="dialog"
                    on:click=|ev: leptos::ev::MouseEvent| ev.stop_propagation()
                >
                    <h2 class="dialog__title">{move || read(draft, |d| d.integration.name.clone())}</h2>
                    <p class="dialog__subtitle">{move || read(draft, |d| d.integration.kind.label())}</p>

                    <div class="integration-dialog__status" class:integration-dialog__status--on=connected>
                        <span>{move || if connected() { "✓ Conectado" } else { "✕ No conectado" }}</span>
                        <Show when=connected>
                            <button class="btn btn--ghost" on:click=on_disconnect>
                                "Desconectar"
                            </button>
                        </Show>
                    </div>

                    {text_field(
                        "API Key / Token",
                        "Ingresa tu API Key...",
                        "password",
                        |d| d.api_key.clone(),
                        |d, v| d.api_key = v,
                    )}
                    {text_field(
                        "Webhook URL (opcional)",
                        "https://tu-webhook.com/endpoint",
                        "text",
                        |d| d.webhook_url.clone(),
                        |d, v| d.webhook_url = v,
                    )}
                    {text_field(
                        "Account ID / Page ID (opcional)",
                        "ID de cuenta o página",
                        "text",
                        |d| d.account_id.clone(),
                        |d, v| d.account_id = v,
                    )}

                    <Show when=move || error.with(Option::is_some)>
                        <p class="form-field__error">{move || error.get()}</p>
                    </Show>

                    {move || {
                        read(draft, |d| (d.integration.docs_url(), d.integration.name.clone()))
                            .and_then(|(url, name)| url.map(|url| (url, name)))
                            .map(|(url, name)| {
                                view! {
                                    <a class="integration-dialog__docs" href=url target="_blank" rel="noopener noreferrer">
                                        {format!("Ver documentación de {name}")}
                                    </a>
                                }
                            })
                    }}

                    <div class="dialog__actions">
                        <button class="btn btn--ghost" disabled=connecting on:click=move |_| close()>
                            "Cancelar"
                        </button>
                        <Show when=move || !connected()>
                            <button
                                class="btn btn--primary"
                                disabled=move || {
                                    connecting() || read(draft, |d| d.api_key.trim().is_empty()).unwrap_or(true)
                                }
                                on:click=on_connect
                            >
                                {move || if connecting() { "Conectando..." } else { "Probar conexión" }}
                            </button>
                        </Show>
                    </div>
                </div>
            </div>
        </Show>
    }
}
