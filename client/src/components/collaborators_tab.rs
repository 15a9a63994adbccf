//! Collaborators tab of the training panel: e-mail invites, invite QR code,
//! and the current collaborator list.

use leptos::prelude::*;

use crate::state::collaborators::{
    CollaboratorRole, CollaboratorStatus, CollaboratorsState, INVITE_DELAY, SENT_FLAG_DURATION, invite_url,
    is_invitable, qr_file_name, qr_url,
};
use crate::util::storage::BrowserStorage;
use crate::util::timer::after;

fn page_origin() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().and_then(|w| w.location().origin().ok()).unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}

fn initial(name: &str) -> String {
    name.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

#[component]
pub fn CollaboratorsTab(
    collaborators: RwSignal<CollaboratorsState>,
    assistant_id: String,
    assistant_name: String,
) -> impl IntoView {
    let email = RwSignal::new(String::new());
    let role = RwSignal::new(CollaboratorRole::default());
    let sending = RwSignal::new(false);
    let sent = RwSignal::new(false);
    let show_qr = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let link = invite_url(&page_origin(), &assistant_id);
    let qr_src = qr_url(&link);
    let download_name = qr_file_name(&assistant_name);

    let on_invite = move |_| {
        if sending.get_untracked() || !is_invitable(email.get_untracked().trim()) {
            return;
        }
        sending.set(true);
        error.set(None);
        after(INVITE_DELAY, move || {
            let address = email.get_untracked();
            let mut outcome = None;
            collaborators.update(|c| outcome = Some(c.invite(&BrowserStorage, &address, role.get_untracked())));
            sending.set(false);
            match outcome {
                Some(Ok(_)) => {
                    email.set(String::new());
                    sent.set(true);
                    after(SENT_FLAG_DURATION, move || sent.set(false));
                }
                Some(Err(e)) => {
                    log::warn!("invite failed: {e}");
                    error.set(Some(e.to_string()));
                }
                None => {}
            }
        });
    };

    let on_remove = move |id: String| {
        collaborators.update(|c| {
            if let Err(e) = c.remove(&BrowserStorage, &id) {
                log::warn!("could not remove collaborator {id}: {e}");
            }
        });
    };

    view! {
        <div class="collaborators-tab">
            <div>
                <h4 class="panel-section__title">"Invitar Colaboradores"</h4>
                <p class="panel-section__hint">"Trabaja en equipo para alimentar y mejorar tu asistente"</p>
            </div>

            <div class="panel-section">
                <span class="form-field__label">"Invitar por correo electrónico"</span>
                <div class="collaborators-tab__invite">
                    <input
                        class="input"
                        type="email"
                        placeholder="correo@ejemplo.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <select
                        class="input"
                        prop:value=move || role.get().as_str()
                        on:change=move |ev| {
                            if let Some(r) = CollaboratorRole::parse(&event_target_value(&ev)) {
                                role.set(r);
                            }
                        }
                    >
                        {CollaboratorRole::ALL
                            .into_iter()
                            .map(|r| {
                                let label = if r == CollaboratorRole::Admin { "Admin" } else { r.label() };
                                view! { <option value=r.as_str()>{label}</option> }
                            })
                            .collect::<Vec<_>>()}
                    </select>
                </div>
                <button
                    class="btn btn--primary"
                    disabled=move || sending.get() || !email.with(|e| is_invitable(e.trim()))
                    on:click=on_invite
                >
                    {move || {
                        if sending.get() {
                            "Enviando..."
                        } else if sent.get() {
                            "¡Invitación enviada!"
                        } else {
                            "Enviar invitación"
                        }
                    }}
                </button>
                <Show when=move || error.with(Option::is_some)>
                    <p class="form-field__error">{move || error.get()}</p>
                </Show>
            </div>

            <div class="panel-section">
                <div class="panel-section__row">
                    <span class="form-field__label">"Código QR de invitación"</span>
                    <button class="btn btn--ghost" on:click=move |_| show_qr.update(|v| *v = !*v)>
                        {move || if show_qr.get() { "Ocultar QR" } else { "Mostrar QR" }}
                    </button>
                </div>
                <Show when=move || show_qr.get()>
                    <div class="collaborators-tab__qr">
                        <img src=qr_src.clone() alt="QR de invitación" width="150" height="150"/>
                        <a class="btn btn--outline" href=qr_src.clone() download=download_name.clone() target="_blank">
                            "Descargar QR"
                        </a>
                        <code class="collaborators-tab__link">{link.clone()}</code>
                        <p class="panel-section__hint">
                            "Comparte este código QR para que otros puedan unirse como colaboradores"
                        </p>
                    </div>
                </Show>
            </div>

            <div class="panel-section">
                <span class="form-field__label">
                    {move || format!("Colaboradores ({})", collaborators.with(|c| c.items().len()))}
                </span>
                <Show
                    when=move || collaborators.with(|c| !c.items().is_empty())
                    fallback=|| {
                        view! {
                            <div class="panel-empty">
                                <p>"No hay colaboradores aún"</p>
                                <p class="panel-section__hint">"Invita a tu equipo para trabajar juntos"</p>
                            </div>
                        }
                    }
                >
                    <ul class="collaborators-tab__list">
                        {move || {
                            collaborators
                                .with(|c| c.items().to_vec())
                                .into_iter()
                                .map(|colab| {
                                    let id = colab.id.clone();
                                    view! {
                                        <li class="collaborator-row">
                                            <span class="collaborator-row__avatar">{initial(&colab.name)}</span>
                                            <div class="collaborator-row__who">
                                                <p>{colab.name.clone()}</p>
                                                <p class="panel-section__hint">{colab.email.clone()}</p>
                                            </div>
                                            <span class=format!("badge badge--role-{}", colab.role.as_str())>
                                                {colab.role.label()}
                                            </span>
                                            {(colab.status == CollaboratorStatus::Pending)
                                                .then(|| view! { <span class="badge badge--pending">"Pendiente"</span> })}
                                            <button
                                                class="btn btn--icon"
                                                aria-label="Eliminar colaborador"
                                                on:click=move |_| on_remove(id.clone())
                                            >
                                                "🗑"
                                            </button>
                                        </li>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </ul>
                </Show>
            </div>
        </div>
    }
}
