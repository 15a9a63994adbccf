//! Speech capture and playback behind small capability traits.
//!
//! SYSTEM CONTEXT
//! ==============
//! The chat session never talks to the Web Speech API directly. It asks for
//! capture or playback through effects, and the chat panel forwards those to a
//! [`SpeechInput`] / [`SpeechOutput`] implementation. Browser events come back
//! as [`SpeechInputEvent`] / [`SpeechOutputEvent`] values.
//!
//! Under `hydrate` the implementation is [`WebSpeech`]; the recognizer and the
//! live utterance are held in thread-locals because their JS handles are not
//! `Send` and must outlive any single callback. Everywhere else [`NoSpeech`]
//! reports the capability as unsupported.

#[cfg(test)]
#[path = "speech_test.rs"]
mod speech_test;

/// Microphone permission as last reported by the browser.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MicPermission {
    #[default]
    Unknown,
    Prompt,
    Granted,
    Denied,
}

/// Classified capture failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("microphone permission denied")]
    NotAllowed,
    #[error("no speech detected")]
    NoSpeech,
    #[error("capture aborted")]
    Aborted,
    #[error("capture failed: {0}")]
    Other(String),
}

impl CaptureError {
    /// Map a Web Speech error code (`"no-speech"`, `"not-allowed"`, ...).
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" | "service-not-allowed" => CaptureError::NotAllowed,
            "no-speech" => CaptureError::NoSpeech,
            "aborted" => CaptureError::Aborted,
            other => CaptureError::Other(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech is not supported on this platform")]
    Unsupported,
    #[error("speech failed to start: {0}")]
    StartFailed(String),
    #[error("microphone access denied")]
    MicrophoneDenied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechInputEvent {
    Started,
    Interim(String),
    Final(String),
    Error(CaptureError),
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOutputEvent {
    Started,
    Ended,
    Failed,
}

/// Continuous speech-to-text capture.
pub trait SpeechInput {
    fn supported(&self) -> bool;

    /// Begin capturing. A capture already running is aborted and restarted.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Unsupported`] without a recognizer, or
    /// [`SpeechError::StartFailed`] when the browser refuses to start.
    fn start(&self) -> Result<(), SpeechError>;

    fn abort(&self);
}

/// Text-to-speech playback.
pub trait SpeechOutput {
    fn supported(&self) -> bool;

    /// Speak `text`, cancelling anything still playing.
    ///
    /// # Errors
    ///
    /// Returns an error when synthesis is unavailable.
    fn speak(&self, text: &str, lang_tag: &str) -> Result<(), SpeechError>;

    fn cancel(&self);
}

/// Capability stub for platforms without speech.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSpeech;

impl SpeechInput for NoSpeech {
    fn supported(&self) -> bool {
        false
    }

    fn start(&self) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn abort(&self) {}
}

impl SpeechOutput for NoSpeech {
    fn supported(&self) -> bool {
        false
    }

    fn speak(&self, _text: &str, _lang_tag: &str) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn cancel(&self) {}
}

/// Split a batch of `(is_final, transcript)` results into interim and final text.
#[must_use]
pub fn collate_results(results: &[(bool, String)]) -> (String, String) {
    let mut interim = String::new();
    let mut final_text = String::new();
    for (is_final, transcript) in results {
        if *is_final {
            final_text.push_str(transcript);
        } else {
            interim.push_str(transcript);
        }
    }
    (interim, final_text)
}

/// Ask for microphone access and immediately release the stream.
///
/// # Errors
///
/// [`SpeechError::MicrophoneDenied`] when the user or browser refuses.
pub async fn request_microphone() -> Result<(), SpeechError> {
    #[cfg(feature = "hydrate")]
    {
        web::request_microphone().await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(SpeechError::Unsupported)
    }
}

#[cfg(feature = "hydrate")]
pub use web::{WebSpeech, watch_microphone_permission};

#[cfg(feature = "hydrate")]
mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::{JsCast, JsValue, closure::Closure};

    use super::{
        CaptureError, MicPermission, SpeechError, SpeechInput, SpeechInputEvent, SpeechOutput, SpeechOutputEvent,
        collate_results,
    };

    type EventHandler = Closure<dyn FnMut(web_sys::Event)>;

    struct Capture {
        recognition: web_sys::SpeechRecognition,
        active: Rc<Cell<bool>>,
        restart_pending: Rc<Cell<bool>>,
        _handlers: Vec<EventHandler>,
    }

    struct Playback {
        utterance: web_sys::SpeechSynthesisUtterance,
        _handlers: Vec<EventHandler>,
    }

    thread_local! {
        static CAPTURE: RefCell<Option<Capture>> = const { RefCell::new(None) };
        static PLAYBACK: RefCell<Option<Playback>> = const { RefCell::new(None) };
        static OUTPUT_SINK: RefCell<Option<Rc<dyn Fn(SpeechOutputEvent)>>> = const { RefCell::new(None) };
    }

    fn handler(f: impl FnMut(web_sys::Event) + 'static) -> EventHandler {
        Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>)
    }

    fn construct_recognition() -> Option<web_sys::SpeechRecognition> {
        let window = web_sys::window()?;
        let ctor = ["SpeechRecognition", "webkitSpeechRecognition"]
            .into_iter()
            .find_map(|name| {
                js_sys::Reflect::get(&window, &JsValue::from_str(name))
                    .ok()
                    .filter(JsValue::is_function)
            })?;
        let ctor: js_sys::Function = ctor.unchecked_into();
        js_sys::Reflect::construct(&ctor, &js_sys::Array::new())
            .ok()
            .map(JsCast::unchecked_into)
    }

    fn synthesis() -> Option<web_sys::SpeechSynthesis> {
        web_sys::window()?.speech_synthesis().ok()
    }

    fn emit_output(event: SpeechOutputEvent) {
        let sink = OUTPUT_SINK.with(|s| s.borrow().clone());
        if let Some(sink) = sink {
            sink(event);
        }
    }

    fn detach_playback() {
        if let Some(playback) = PLAYBACK.with(|p| p.borrow_mut().take()) {
            playback.utterance.set_onstart(None);
            playback.utterance.set_onend(None);
            playback.utterance.set_onerror(None);
        }
    }

    /// Web Speech API backed capture and playback.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct WebSpeech;

    impl WebSpeech {
        /// Create the recognizer for `lang_tag` and route browser events to the
        /// given sinks. Replaces any previous installation.
        pub fn install(
            lang_tag: &str,
            on_input: impl Fn(SpeechInputEvent) + 'static,
            on_output: impl Fn(SpeechOutputEvent) + 'static,
        ) {
            Self::uninstall();
            OUTPUT_SINK.with(|s| *s.borrow_mut() = Some(Rc::new(on_output)));

            let Some(recognition) = construct_recognition() else {
                log::info!("speech recognition is not available in this browser");
                return;
            };
            let _ = recognition.set_continuous(true);
            let _ = recognition.set_interim_results(true);
            let _ = recognition.set_max_alternatives(1);
            let _ = recognition.set_lang(lang_tag);

            let sink: Rc<dyn Fn(SpeechInputEvent)> = Rc::new(on_input);
            let active = Rc::new(Cell::new(false));
            let restart_pending = Rc::new(Cell::new(false));

            let onstart = {
                let sink = Rc::clone(&sink);
                let active = Rc::clone(&active);
                handler(move |_| {
                    active.set(true);
                    sink(SpeechInputEvent::Started);
                })
            };

            let onresult = {
                let sink = Rc::clone(&sink);
                handler(move |e| {
                    let Ok(event) = e.dyn_into::<web_sys::SpeechRecognitionEvent>() else {
                        return;
                    };
                    let Some(list) = event.results() else {
                        return;
                    };
                    let batch: Vec<(bool, String)> = (event.result_index()..list.length())
                        .filter_map(|i| list.get(i))
                        .filter_map(|result| Some((result.is_final(), result.get(0)?.transcript())))
                        .collect();
                    let (interim, final_text) = collate_results(&batch);
                    if !interim.is_empty() {
                        sink(SpeechInputEvent::Interim(interim));
                    }
                    let final_text = final_text.trim();
                    if !final_text.is_empty() {
                        sink(SpeechInputEvent::Final(final_text.to_owned()));
                    }
                })
            };

            let onerror = {
                let sink = Rc::clone(&sink);
                handler(move |e| {
                    let code = js_sys::Reflect::get(&e, &JsValue::from_str("error"))
                        .ok()
                        .and_then(|v| v.as_string())
                        .unwrap_or_default();
                    log::debug!("speech recognition error: {code}");
                    sink(SpeechInputEvent::Error(CaptureError::from_code(&code)));
                })
            };

            // The end event of an abort issued by a restart is swallowed; the
            // recognizer is started again instead.
            let onend = {
                let sink = Rc::clone(&sink);
                let active = Rc::clone(&active);
                let restart_pending = Rc::clone(&restart_pending);
                let recognition = recognition.clone();
                handler(move |_| {
                    active.set(false);
                    if restart_pending.replace(false) && recognition.start().is_ok() {
                        return;
                    }
                    sink(SpeechInputEvent::Ended);
                })
            };

            recognition.set_onstart(Some(onstart.as_ref().unchecked_ref()));
            recognition.set_onresult(Some(onresult.as_ref().unchecked_ref()));
            recognition.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            recognition.set_onend(Some(onend.as_ref().unchecked_ref()));

            CAPTURE.with(|c| {
                *c.borrow_mut() = Some(Capture {
                    recognition,
                    active,
                    restart_pending,
                    _handlers: vec![onstart, onresult, onerror, onend],
                });
            });
        }

        /// Abort capture, cancel playback and drop every browser handle.
        pub fn uninstall() {
            if let Some(capture) = CAPTURE.with(|c| c.borrow_mut().take()) {
                capture.recognition.set_onstart(None);
                capture.recognition.set_onresult(None);
                capture.recognition.set_onerror(None);
                capture.recognition.set_onend(None);
                capture.recognition.abort();
            }
            detach_playback();
            if let Some(synth) = synthesis() {
                synth.cancel();
            }
            OUTPUT_SINK.with(|s| s.borrow_mut().take());
        }
    }

    impl SpeechInput for WebSpeech {
        fn supported(&self) -> bool {
            CAPTURE.with(|c| c.borrow().is_some())
        }

        fn start(&self) -> Result<(), SpeechError> {
            CAPTURE.with(|c| {
                let guard = c.borrow();
                let Some(capture) = guard.as_ref() else {
                    return Err(SpeechError::Unsupported);
                };
                if capture.active.get() {
                    capture.restart_pending.set(true);
                    capture.recognition.abort();
                    return Ok(());
                }
                capture
                    .recognition
                    .start()
                    .map_err(|e| SpeechError::StartFailed(format!("{e:?}")))
            })
        }

        fn abort(&self) {
            CAPTURE.with(|c| {
                if let Some(capture) = c.borrow().as_ref() {
                    capture.restart_pending.set(false);
                    capture.recognition.abort();
                }
            });
        }
    }

    impl SpeechOutput for WebSpeech {
        fn supported(&self) -> bool {
            synthesis().is_some()
        }

        fn speak(&self, text: &str, lang_tag: &str) -> Result<(), SpeechError> {
            let synth = synthesis().ok_or(SpeechError::Unsupported)?;
            detach_playback();
            synth.cancel();

            let utterance = web_sys::SpeechSynthesisUtterance::new_with_text(text)
                .map_err(|e| SpeechError::StartFailed(format!("{e:?}")))?;
            utterance.set_lang(lang_tag);
            utterance.set_rate(1.0);
            utterance.set_pitch(1.0);

            let onstart = handler(|_| emit_output(SpeechOutputEvent::Started));
            let onend = handler(|_| emit_output(SpeechOutputEvent::Ended));
            let onerror = handler(|_| emit_output(SpeechOutputEvent::Failed));
            utterance.set_onstart(Some(onstart.as_ref().unchecked_ref()));
            utterance.set_onend(Some(onend.as_ref().unchecked_ref()));
            utterance.set_onerror(Some(onerror.as_ref().unchecked_ref()));

            synth.speak(&utterance);
            PLAYBACK.with(|p| {
                *p.borrow_mut() = Some(Playback {
                    utterance,
                    _handlers: vec![onstart, onend, onerror],
                });
            });
            Ok(())
        }

        fn cancel(&self) {
            detach_playback();
            if let Some(synth) = synthesis() {
                synth.cancel();
            }
        }
    }

    pub(super) async fn request_microphone() -> Result<(), SpeechError> {
        let devices = web_sys::window()
            .ok_or(SpeechError::Unsupported)?
            .navigator()
            .media_devices()
            .map_err(|_| SpeechError::Unsupported)?;
        let constraints = web_sys::MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|_| SpeechError::MicrophoneDenied)?;
        let stream = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|_| SpeechError::MicrophoneDenied)?;
        let stream: web_sys::MediaStream = stream.unchecked_into();
        for track in stream.get_tracks().iter() {
            track.unchecked_into::<web_sys::MediaStreamTrack>().stop();
        }
        Ok(())
    }

    fn permission_from_state(state: web_sys::PermissionState) -> MicPermission {
        match state {
            web_sys::PermissionState::Granted => MicPermission::Granted,
            web_sys::PermissionState::Denied => MicPermission::Denied,
            web_sys::PermissionState::Prompt => MicPermission::Prompt,
            _ => MicPermission::Unknown,
        }
    }

    /// Report the microphone permission now and whenever it changes.
    pub fn watch_microphone_permission(on_change: impl Fn(MicPermission) + 'static) {
        let Some(permissions) = web_sys::window().and_then(|w| w.navigator().permissions().ok()) else {
            return;
        };
        let descriptor = js_sys::Object::new();
        let _ = js_sys::Reflect::set(
            &descriptor,
            &JsValue::from_str("name"),
            &JsValue::from_str("microphone"),
        );
        let Ok(promise) = permissions.query(&descriptor) else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let Ok(status) = wasm_bindgen_futures::JsFuture::from(promise).await else {
                on_change(MicPermission::Unknown);
                return;
            };
            let status: web_sys::PermissionStatus = status.unchecked_into();
            on_change(permission_from_state(status.state()));
            let watched = status.clone();
            let onchange = handler(move |_| on_change(permission_from_state(watched.state())));
            status.set_onchange(Some(onchange.as_ref().unchecked_ref()));
            onchange.forget();
        });
    }
}
