//! Success / error result dialog driven by `UiState::alert`.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::ui::{AlertKind, UiState};

#[component]
pub fn AlertModal() -> impl IntoView {
    let ui = expect_context::<RwSignal<UiState>>();
    let navigate = use_navigate();

    let on_continue = move |_| {
        let target = ui.get_untracked().alert.and_then(|a| a.continue_to);
        ui.update(UiState::close_alert);
        if let Some(path) = target {
            navigate(&path, NavigateOptions::default());
        }
    };

    view! {
        {move || {
            ui.get()
                .alert
                .map(|alert| {
                    let success = alert.kind == AlertKind::Success;
                    view! {
                        <div class="dialog-backdrop" on:click=move |_| ui.update(UiState::close_alert)>
                            <div
                                class="dialog alert-modal"
                                role="alertdialog"
                                on:click=|ev: leptos::ev::MouseEvent| ev.stop_propagation()
                            >
                                <div class="alert-modal__icon" class:alert-modal__icon--error=!success>
                                    {if success { "✓" } else { "✕" }}
                                </div>
                                <h2 class="dialog__title">{alert.title}</h2>
                                <p class="dialog__body">{alert.description}</p>
                                <div class="dialog__actions dialog__actions--center">
                                    <button
                                        class="btn"
                                        class:btn--success=success
                                        class:btn--danger=!success
                                        on:click=on_continue.clone()
                                    >
                                        "Continuar"
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                })
        }}
    }
}
