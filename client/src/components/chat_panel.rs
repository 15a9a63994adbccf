//! Test chat against the simulated assistant.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`ChatSession`] is a pure reducer; this component owns it in a signal and
//! interprets the [`SessionEffect`]s it returns: timers through
//! `util::timer`, capture and playback through the Web Speech bindings, blob
//! URL release, and insight records handed to the page callbacks.
//!
//! Outside the `hydrate` build the speech backend is `NoSpeech` and no
//! timer ever fires, so server rendering shows the idle session.

use leptos::prelude::*;

use crate::sim::Simulator;
use crate::state::assistant::Assistant;
use crate::state::assistants::AssistantsState;
use crate::state::chat::{ChatAttachment, ChatMessage, ChatRole, FileType, format_file_size};
use crate::state::insights::{ConversationContext, FileAnalysis};
use crate::state::session::{ChatSession, SessionEffect};
use crate::util::files::revoke_object_url;
use crate::util::speech::{MicPermission, SpeechInput, SpeechInputEvent, SpeechOutput, SpeechOutputEvent, request_microphone};
use crate::util::timer::after;

#[cfg(not(feature = "hydrate"))]
type Speech = crate::util::speech::NoSpeech;
#[cfg(feature = "hydrate")]
type Speech = crate::util::speech::WebSpeech;

const ACCEPTED_FILE_TYPES: &str = "application/pdf,.pdf,\
    application/vnd.ms-excel,.xls,\
    application/vnd.openxmlformats-officedocument.spreadsheetml.sheet,.xlsx,\
    application/msword,.doc,\
    application/vnd.openxmlformats-officedocument.wordprocessingml.document,.docx,\
    text/plain,.txt,text/csv,.csv,\
    image/*,video/*";

/// Effect interpreter bound to one session signal.
#[derive(Clone, Copy)]
struct Runner {
    session: RwSignal<ChatSession>,
    notice: RwSignal<Option<String>>,
    on_analysis: Callback<FileAnalysis>,
    on_context: Callback<ConversationContext>,
}

impl Runner {
    /// Apply a reducer step and run whatever it asks for. A no-op once the
    /// panel is gone.
    fn step(self, f: impl FnOnce(&mut ChatSession) -> Vec<SessionEffect>) {
        let effects = self.session.try_update(f).unwrap_or_default();
        self.apply(effects);
    }

    fn apply(self, effects: Vec<SessionEffect>) {
        let speech = Speech::default();
        for effect in effects {
            match effect {
                SessionEffect::Schedule { after: delay, epoch, event } => {
                    after(delay, move || {
                        self.step(|s| s.on_timer(epoch, event, &Simulator, &Simulator, &mut rand::rng()));
                    });
                }
                SessionEffect::StartCapture => {
                    if let Err(e) = speech.start() {
                        log::warn!("speech capture did not start: {e}");
                        self.session.try_update(|s| s.listening = false);
                    }
                }
                SessionEffect::AbortCapture => speech.abort(),
                SessionEffect::Speak { text, lang } => {
                    if let Err(e) = speech.speak(&text, lang) {
                        log::warn!("speech playback failed: {e}");
                        self.step(|s| s.on_speech_output(SpeechOutputEvent::Failed));
                    }
                }
                SessionEffect::CancelSpeech => speech.cancel(),
                SessionEffect::Revoke(url) => revoke_object_url(&url),
                SessionEffect::RecordAnalysis(analysis) => self.on_analysis.run(analysis),
                SessionEffect::SaveContext(context) => self.on_context.run(context),
                SessionEffect::RequestMicrophone => {
                    leptos::task::spawn_local(async move {
                        let granted = match request_microphone().await {
                            Ok(()) => true,
                            Err(e) => {
                                log::warn!("microphone request failed: {e}");
                                false
                            }
                        };
                        self.step(|s| s.microphone_result(granted));
                    });
                }
                SessionEffect::Notice(notice) => self.notice.set(Some(notice.message())),
            }
        }
    }

    fn speech_input(self, event: SpeechInputEvent) {
        self.step(|s| s.on_speech_input(event, &mut rand::rng()));
    }

    fn speech_output(self, event: SpeechOutputEvent) {
        self.step(|s| s.on_speech_output(event));
    }
}

#[component]
pub fn ChatPanel(
    assistant: Assistant,
    on_analysis: Callback<FileAnalysis>,
    on_context: Callback<ConversationContext>,
) -> impl IntoView {
    let session = RwSignal::new(ChatSession::new(&assistant, false));
    let notice = RwSignal::new(None::<String>);
    let text = RwSignal::new(String::new());
    let runner = Runner { session, notice, on_analysis, on_context };
    let log_ref = NodeRef::<leptos::html::Div>::new();

    Effect::new(move |_| {
        #[cfg(feature = "hydrate")]
        {
            use crate::util::speech::{WebSpeech, watch_microphone_permission};

            let lang = session.with_untracked(|s| s.language().speech_tag());
            WebSpeech::install(lang, move |e| runner.speech_input(e), move |e| runner.speech_output(e));
            let supported = SpeechInput::supported(&WebSpeech);
            session.update(|s| s.voice_supported = supported);
            watch_microphone_permission(move |p| {
                session.try_update(|s| s.on_permission_change(p));
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = runner;
        }
    });
    on_cleanup(move || {
        #[cfg(feature = "hydrate")]
        crate::util::speech::WebSpeech::uninstall();
        for url in session.try_with_untracked(ChatSession::attachment_urls).unwrap_or_default() {
            revoke_object_url(&url);
        }
    });

    // Saved training edits reach the next reply without clearing the chat.
    let assistants = expect_context::<RwSignal<AssistantsState>>();
    let assistant_id = assistant.id.clone();
    Effect::new(move |_| {
        if let Some(current) = assistants.with(|repo| repo.get(&assistant_id).cloned()) {
            session.update(|s| s.sync_assistant(&current));
        }
    });

    // Keep the newest message in view.
    Effect::new(move |_| {
        let _ = session.with(|s| (s.messages.len(), s.typing));
        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = log_ref.get() {
                el.set_scroll_top(el.scroll_height());
            }
        }
    });

    let send = move || {
        let typed = text.get_untracked();
        let mut sent = false;
        runner.step(|s| {
            let effects = s.submit(&typed, &mut rand::rng());
            sent = !effects.is_empty();
            effects
        });
        if sent {
            text.set(String::new());
        }
    };

    let on_files = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            use crate::state::chat::FileSource;
            use crate::util::files::take_selected_files;

            let input = event_target::<web_sys::HtmlInputElement>(&ev);
            let picked = take_selected_files(&input);
            let sources: Vec<&dyn FileSource> = picked.iter().map(|f| f as &dyn FileSource).collect();
            runner.step(|s| s.add_files(&sources));
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = ev;
        }
    };

    let typing = move || session.with(|s| s.typing);
    let voice_mode = move || session.with(|s| s.voice_mode);
    let has_messages = move || session.with(|s| !s.messages.is_empty());
    let mic_denied = move || session.with(|s| s.mic_permission == MicPermission::Denied);

    let shown = Signal::derive(move || {
        assistants.with(|repo| repo.get(&assistant.id).cloned()).unwrap_or_else(|| assistant.clone())
    });
    let name = move || shown.with(|a| a.name.clone());
    let subtitle = move || {
        let a = shown.get();
        format!("{} • {} • {}", a.language.label(), a.tone.label(), a.training_config.objective.label())
    };

    let placeholder = move || {
        session.with(|s| {
            if !s.voice_mode {
                "Escribe un mensaje..."
            } else if s.listening {
                "🎤 Escuchando... habla ahora"
            } else if s.speaking {
                "🔊 Asistente hablando..."
            } else {
                "Modo voz activo"
            }
        })
    };

    view! {
        <section class="chat-panel">
            <header class="chat-panel__header">
                <div class="chat-panel__avatar" class:chat-panel__avatar--speaking=move || session.with(|s| s.speaking)>
                    "🤖"
                </div>
                <div class="chat-panel__who">
                    <h4>{name}</h4>
                    <p class="panel-section__hint">{subtitle}</p>
                </div>
                <div class="chat-panel__actions">
                    <button
                        class="btn btn--icon"
                        title=move || {
                            if session.with(|s| s.audio_enabled) { "Desactivar audio" } else { "Activar audio" }
                        }
                        on:click=move |_| runner.step(ChatSession::toggle_audio)
                    >
                        {move || if session.with(|s| s.audio_enabled) { "🔊" } else { "🔇" }}
                    </button>
                    <Show when=has_messages>
                        <button
                            class="btn btn--icon"
                            title="Guardar contexto"
                            on:click=move |_| runner.step(ChatSession::save_context)
                        >
                            {move || if session.with(|s| s.context_saved) { "✓" } else { "💾" }}
                        </button>
                    </Show>
                    <button
                        class="btn btn--icon"
                        title="Reiniciar conversación"
                        on:click=move |_| {
                            runner.step(ChatSession::reset);
                            text.set(String::new());
                        }
                    >
                        "↺"
                    </button>
                </div>
            </header>

            {move || {
                notice
                    .get()
                    .map(|message| {
                        view! {
                            <div class="chat-panel__notice" role="alert">
                                <span>{message}</span>
                                <button class="btn btn--icon" on:click=move |_| notice.set(None)>"✕"</button>
                            </div>
                        }
                    })
            }}

            <div class="chat-panel__log" node_ref=log_ref>
                <Show
                    when=has_messages
                    fallback=move || {
                        view! {
                            <div class="chat-panel__empty">
                                <p>"Envía un mensaje para comenzar la conversación"</p>
                                <p class="panel-section__hint">
                                    "📎 Puedes adjuntar documentos, imágenes, videos, PDF o Excel"
                                </p>
                                <Show when=move || session.with(|s| s.voice_supported)>
                                    <p class="panel-section__hint">"🎤 Activa el modo voz para conversar fluidamente"</p>
                                </Show>
                            </div>
                        }
                    }
                >
                    {move || session.with(|s| s.messages.clone()).into_iter().map(message_view).collect::<Vec<_>>()}
                </Show>
                <Show when=typing>
                    <div class="chat-message chat-message--assistant chat-message--typing">
                        <span class="chat-message__avatar">"🤖"</span>
                        <span>
                            {move || {
                                if session.with(|s| s.analyzing) { "Analizando archivos..." } else { "Escribiendo..." }
                            }}
                        </span>
                    </div>
                </Show>
            </div>

            <Show when=move || session.with(|s| !s.pending_attachments.is_empty())>
                <div class="chat-panel__pending">
                    {move || {
                        session
                            .with(|s| s.pending_attachments.clone())
                            .into_iter()
                            .map(|a| {
                                let id = a.id.clone();
                                view! {
                                    <div class="pending-file">
                                        {attachment_preview(&a, false)}
                                        <button
                                            class="btn btn--icon"
                                            aria-label="Quitar archivo"
                                            on:click=move |_| {
                                                let id = id.clone();
                                                runner.step(move |s| s.remove_attachment(&id));
                                            }
                                        >
                                            "✕"
                                        </button>
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </div>
            </Show>

            <div class="chat-panel__composer">
                <label class="btn btn--outline btn--icon" title="Adjuntar archivo (PDF, Excel, Video, Imagen)">
                    "📎"
                    <input
                        class="visually-hidden"
                        type="file"
                        multiple=true
                        accept=ACCEPTED_FILE_TYPES
                        disabled=typing
                        on:change=on_files
                    />
                </label>
                <Show when=move || session.with(|s| s.voice_supported)>
                    <button
                        class="btn btn--icon"
                        class:btn--voice-on=voice_mode
                        class:btn--listening=move || session.with(|s| s.voice_mode && s.listening)
                        disabled=move || typing() || mic_denied()
                        title=move || {
                            if mic_denied() {
                                "Permiso de micrófono denegado"
                            } else if voice_mode() {
                                "Desactivar modo conversación"
                            } else {
                                "Activar modo conversación por voz"
                            }
                        }
                        on:click=move |_| runner.step(ChatSession::toggle_voice_mode)
                    >
                        {move || if mic_denied() { "🚫" } else { "🎤" }}
                    </button>
                </Show>
                <input
                    class="input"
                    placeholder=placeholder
                    disabled=move || typing() || voice_mode()
                    prop:value=move || {
                        let interim = session.with(|s| s.interim_transcript.clone());
                        if interim.is_empty() { text.get() } else { interim }
                    }
                    on:input=move |ev| text.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" && !ev.shift_key() {
                            ev.prevent_default();
                            send();
                        }
                    }
                />
                <button
                    class="btn btn--primary btn--icon"
                    aria-label="Enviar"
                    disabled=move || {
                        typing() || (text.with(|t| t.trim().is_empty()) && session.with(|s| s.pending_attachments.is_empty()))
                    }
                    on:click=move |_| send()
                >
                    "➤"
                </button>
            </div>

            <p class="chat-panel__hint">
                {move || {
                    if voice_mode() {
                        "🎤 Modo conversación activo - Habla y el asistente responderá"
                    } else {
                        "Formatos: PDF, Excel, Word, Imágenes, Videos (máx. 10MB)"
                    }
                }}
            </p>
        </section>
    }
}

fn attachment_preview(attachment: &ChatAttachment, with_size: bool) -> AnyView {
    match attachment.file_type {
        FileType::Image => view! { <img class="attachment__image" src=attachment.url.clone() alt=attachment.name.clone()/> }.into_any(),
        FileType::Video if with_size => {
            view! { <video class="attachment__video" src=attachment.url.clone() controls=true></video> }.into_any()
        }
        other => {
            let size = with_size.then(|| format_file_size(attachment.size));
            view! {
                <span class="attachment__file">
                    {other.icon()}
                    " "
                    <span class="attachment__name">{attachment.name.clone()}</span>
                    {size.map(|s| view! { <span class="attachment__size">{s}</span> })}
                </span>
            }
                .into_any()
        }
    }
}

fn message_view(message: ChatMessage) -> impl IntoView {
    let from_user = message.role == ChatRole::User;
    let attachments = message.attachment_list().to_vec();
    view! {
        <div class="chat-message" class:chat-message--user=from_user class:chat-message--assistant=!from_user>
            <span class="chat-message__avatar">{if from_user { "👤" } else { "🤖" }}</span>
            <div class="chat-message__body">
                {(!attachments.is_empty())
                    .then(|| {
                        view! {
                            <div class="chat-message__attachments">
                                {attachments.iter().map(|a| attachment_preview(a, true)).collect::<Vec<_>>()}
                            </div>
                        }
                    })}
                {(!message.content.is_empty())
                    .then(|| {
                        view! {
                            <p class="chat-bubble" class:chat-bubble--user=from_user>
                                {message.is_audio.unwrap_or(false).then_some("🎤 ")}
                                {message.content.clone()}
                            </p>
                        }
                    })}
            </div>
        </div>
    }
}
