//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::{assistant::AssistantPage, home::HomePage};
use crate::state::{assistants::AssistantsState, ui::UiState};
use crate::util::storage::BrowserStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="es">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the assistant repository and list-page UI state, and performs the
/// first storage read once mounted in the browser.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let assistants = RwSignal::new(AssistantsState::default());
    let ui = RwSignal::new(UiState::default());

    provide_context(assistants);
    provide_context(ui);

    // Effects never run during SSR, so storage is only read after hydration.
    Effect::new(move || {
        let backend = BrowserStorage;
        assistants.update(|s| {
            if let Err(e) = s.hydrate(&backend) {
                log::warn!("seeding example assistants failed: {e}");
            }
        });
        ui.update(|u| u.hydrate(&backend));
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/assistant-studio.css"/>
        <Title text="Asistentes IA"/>

        <Router>
            <Routes fallback=|| view! { <NotFound/> }>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=ParamSegment("id") view=AssistantPage/>
            </Routes>
        </Router>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>"Página no encontrada"</p>
            <a class="btn" href="/">"Volver al inicio"</a>
        </div>
    }
}
