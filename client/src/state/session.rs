//! Chat simulator session: a pure reducer over the visit's conversation.
//!
//! DESIGN
//! ======
//! Every operation mutates [`ChatSession`] and returns the side effects the UI
//! must perform as [`SessionEffect`] values: timers, speech capture and
//! playback, blob URL release, and records for the insights store. The chat
//! panel interprets them; nothing here touches the browser or storage.
//!
//! Timers carry the session epoch they were scheduled in. [`ChatSession::reset`]
//! bumps the epoch, so replies and restarts that were still pending when the
//! user reset the chat are dropped on arrival.
//!
//! FLAGS
//! =====
//! `typing`, `analyzing`, `listening` and `speaking` are independent and may
//! overlap. The session is idle when all four are false.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashSet;
use std::time::Duration;

use rand::{Rng, RngCore};

use crate::sim::{FileAnalyzer, ResponseSource};
use crate::state::assistant::{Assistant, Language, Objective};
use crate::state::chat::{ATTACHMENTS_ONLY_TEXT, AttachmentError, ChatAttachment, ChatMessage, FileSource, accept_file};
use crate::state::insights::{ConversationContext, FileAnalysis};
use crate::util::speech::{CaptureError, MicPermission, SpeechInputEvent, SpeechOutputEvent};

const ANALYSIS_DELAY_MS: (u64, u64) = (2000, 3500);
const TYPING_DELAY_MS: (u64, u64) = (1000, 2000);
pub const RESUME_AFTER_REPLY: Duration = Duration::from_millis(500);
pub const RESUME_AFTER_SPEECH: Duration = Duration::from_millis(300);
pub const RESTART_CAPTURE: Duration = Duration::from_millis(100);
pub const SAVED_FLAG_DURATION: Duration = Duration::from_secs(2);

/// Deferred step of the session, delivered back through [`ChatSession::on_timer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    AnalysisDone,
    ReplyReady { with_files: bool },
    ResumeCapture,
    ClearSavedFlag,
}

/// User-facing message raised by the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    VoiceUnsupported,
    MicrophoneUnavailable,
    MicrophoneBlocked,
    AttachmentRejected(AttachmentError),
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Notice::VoiceUnsupported => "Tu navegador no soporta reconocimiento de voz".to_owned(),
            Notice::MicrophoneUnavailable => {
                "No se pudo acceder al micrófono. Por favor, permite el acceso en la configuración del navegador."
                    .to_owned()
            }
            Notice::MicrophoneBlocked => {
                "Permiso de micrófono denegado. Por favor, permite el acceso al micrófono en la configuración del navegador."
                    .to_owned()
            }
            Notice::AttachmentRejected(err) => err.to_string(),
        }
    }
}

/// Side effect requested by the session.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEffect {
    Schedule {
        after: Duration,
        epoch: u64,
        event: TimerEvent,
    },
    StartCapture,
    AbortCapture,
    Speak {
        text: String,
        lang: &'static str,
    },
    CancelSpeech,
    Revoke(String),
    RecordAnalysis(FileAnalysis),
    SaveContext(ConversationContext),
    RequestMicrophone,
    Notice(Notice),
}

fn random_delay(rng: &mut dyn RngCore, (min, max): (u64, u64)) -> Duration {
    Duration::from_millis(rng.random_range(min..=max))
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatSession {
    assistant_id: String,
    assistant_name: String,
    language: Language,
    objective: Option<Objective>,
    pub messages: Vec<ChatMessage>,
    pub pending_attachments: Vec<ChatAttachment>,
    pub analyses: Vec<FileAnalysis>,
    pub typing: bool,
    pub analyzing: bool,
    pub listening: bool,
    pub speaking: bool,
    pub voice_mode: bool,
    pub audio_enabled: bool,
    pub interim_transcript: String,
    pub mic_permission: MicPermission,
    pub context_saved: bool,
    pub voice_supported: bool,
    epoch: u64,
    in_flight: Vec<ChatAttachment>,
}

impl ChatSession {
    #[must_use]
    pub fn new(assistant: &Assistant, voice_supported: bool) -> Self {
        Self {
            assistant_id: assistant.id.clone(),
            assistant_name: assistant.name.clone(),
            language: assistant.language,
            objective: Some(assistant.training_config.objective),
            messages: Vec::new(),
            pending_attachments: Vec::new(),
            analyses: Vec::new(),
            typing: false,
            analyzing: false,
            listening: false,
            speaking: false,
            voice_mode: false,
            audio_enabled: assistant.audio_enabled,
            interim_transcript: String::new(),
            mic_permission: MicPermission::Unknown,
            context_saved: false,
            voice_supported,
            epoch: 0,
            in_flight: Vec::new(),
        }
    }

    /// Follow edits to the stored assistant without touching the conversation.
    pub fn sync_assistant(&mut self, assistant: &Assistant) {
        self.assistant_name.clone_from(&assistant.name);
        self.language = assistant.language;
        self.objective = Some(assistant.training_config.objective);
    }

    /// Every blob URL the session still holds, pending and sent, each once.
    #[must_use]
    pub fn attachment_urls(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.pending_attachments
            .iter()
            .chain(self.messages.iter().flat_map(ChatMessage::attachment_list))
            .filter(|a| seen.insert(a.url.as_str()))
            .map(|a| a.url.clone())
            .collect()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        !(self.typing || self.analyzing || self.listening || self.speaking)
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    fn schedule(&self, after: Duration, event: TimerEvent) -> SessionEffect {
        SessionEffect::Schedule {
            after,
            epoch: self.epoch,
            event,
        }
    }

    fn can_resume_capture(&self) -> bool {
        self.voice_mode && !self.typing && !self.speaking
    }

    fn begin_reply(&mut self, attachments: Vec<ChatAttachment>, rng: &mut dyn RngCore) -> Vec<SessionEffect> {
        self.typing = true;
        if attachments.is_empty() {
            return vec![self.schedule(random_delay(rng, TYPING_DELAY_MS), TimerEvent::ReplyReady { with_files: false })];
        }
        self.analyzing = true;
        self.in_flight = attachments;
        vec![self.schedule(random_delay(rng, ANALYSIS_DELAY_MS), TimerEvent::AnalysisDone)]
    }

    /// Send typed text plus any pending attachments.
    ///
    /// Ignored while a reply is being prepared or when there is nothing to send.
    pub fn submit(&mut self, text: &str, rng: &mut dyn RngCore) -> Vec<SessionEffect> {
        let text = text.trim();
        if self.typing || (text.is_empty() && self.pending_attachments.is_empty()) {
            return Vec::new();
        }
        let attachments = std::mem::take(&mut self.pending_attachments);
        let content = if text.is_empty() { ATTACHMENTS_ONLY_TEXT } else { text };
        self.messages
            .push(ChatMessage::user(content).with_attachments(attachments.clone()));
        self.begin_reply(attachments, rng)
    }

    /// Send a final voice transcript as an audio message.
    pub fn submit_transcript(&mut self, text: &str, rng: &mut dyn RngCore) -> Vec<SessionEffect> {
        let text = text.trim();
        self.interim_transcript.clear();
        if text.is_empty() {
            return Vec::new();
        }
        self.messages.push(ChatMessage::user(text).with_audio());
        self.typing = true;
        vec![self.schedule(random_delay(rng, TYPING_DELAY_MS), TimerEvent::ReplyReady { with_files: false })]
    }

    /// Deliver a timer scheduled by an earlier effect. Timers from before the
    /// last reset are ignored.
    pub fn on_timer(
        &mut self,
        epoch: u64,
        event: TimerEvent,
        responses: &dyn ResponseSource,
        analyzer: &dyn FileAnalyzer,
        rng: &mut dyn RngCore,
    ) -> Vec<SessionEffect> {
        if epoch != self.epoch {
            log::debug!("dropping stale {event:?} from epoch {epoch}");
            return Vec::new();
        }
        match event {
            TimerEvent::AnalysisDone => {
                let files = std::mem::take(&mut self.in_flight);
                let mut effects = Vec::with_capacity(files.len() + 1);
                for file in &files {
                    let analysis = analyzer.analyze(file, self.language, rng);
                    self.analyses.push(analysis.clone());
                    effects.push(SessionEffect::RecordAnalysis(analysis));
                }
                self.analyzing = false;
                effects.push(self.schedule(random_delay(rng, TYPING_DELAY_MS), TimerEvent::ReplyReady { with_files: true }));
                effects
            }
            TimerEvent::ReplyReady { with_files } => {
                let mut reply = responses.pick(self.language, self.objective, rng);
                if with_files {
                    reply = format!("{} {reply}", responses.attachment_remark(self.language, rng));
                }
                self.messages.push(ChatMessage::assistant(reply.clone()));
                self.typing = false;
                if self.audio_enabled {
                    vec![SessionEffect::Speak {
                        text: reply,
                        lang: self.language.speech_tag(),
                    }]
                } else if self.voice_mode {
                    vec![self.schedule(RESUME_AFTER_REPLY, TimerEvent::ResumeCapture)]
                } else {
                    Vec::new()
                }
            }
            TimerEvent::ResumeCapture => {
                if self.can_resume_capture() {
                    self.listening = true;
                    vec![SessionEffect::StartCapture]
                } else {
                    Vec::new()
                }
            }
            TimerEvent::ClearSavedFlag => {
                self.context_saved = false;
                Vec::new()
            }
        }
    }

    /// Apply an event from speech capture.
    pub fn on_speech_input(&mut self, event: SpeechInputEvent, rng: &mut dyn RngCore) -> Vec<SessionEffect> {
        match event {
            SpeechInputEvent::Started => {
                self.listening = true;
                Vec::new()
            }
            SpeechInputEvent::Interim(text) => {
                self.interim_transcript = text;
                Vec::new()
            }
            SpeechInputEvent::Final(text) => self.submit_transcript(&text, rng),
            SpeechInputEvent::Error(CaptureError::NotAllowed) => {
                self.mic_permission = MicPermission::Denied;
                self.voice_mode = false;
                self.listening = false;
                self.interim_transcript.clear();
                vec![SessionEffect::Notice(Notice::MicrophoneBlocked)]
            }
            SpeechInputEvent::Error(CaptureError::NoSpeech) => {
                if self.can_resume_capture() {
                    vec![self.schedule(RESTART_CAPTURE, TimerEvent::ResumeCapture)]
                } else {
                    Vec::new()
                }
            }
            SpeechInputEvent::Error(CaptureError::Aborted) => Vec::new(),
            SpeechInputEvent::Error(CaptureError::Other(code)) => {
                log::warn!("speech capture stopped: {code}");
                self.listening = false;
                Vec::new()
            }
            SpeechInputEvent::Ended => {
                self.listening = false;
                if self.can_resume_capture() {
                    vec![self.schedule(RESTART_CAPTURE, TimerEvent::ResumeCapture)]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Apply an event from speech playback.
    pub fn on_speech_output(&mut self, event: SpeechOutputEvent) -> Vec<SessionEffect> {
        match event {
            SpeechOutputEvent::Started => {
                self.speaking = true;
                Vec::new()
            }
            SpeechOutputEvent::Ended => {
                self.speaking = false;
                if self.voice_mode && !self.typing {
                    vec![self.schedule(RESUME_AFTER_SPEECH, TimerEvent::ResumeCapture)]
                } else {
                    Vec::new()
                }
            }
            SpeechOutputEvent::Failed => {
                self.speaking = false;
                Vec::new()
            }
        }
    }

    pub fn on_permission_change(&mut self, permission: MicPermission) {
        self.mic_permission = permission;
    }

    /// Turn hands-free voice mode on or off.
    ///
    /// Turning it on only requests the microphone; voice mode activates in
    /// [`ChatSession::microphone_result`] once access is granted.
    pub fn toggle_voice_mode(&mut self) -> Vec<SessionEffect> {
        if self.voice_mode {
            self.voice_mode = false;
            self.listening = false;
            self.speaking = false;
            self.interim_transcript.clear();
            return vec![SessionEffect::AbortCapture, SessionEffect::CancelSpeech];
        }
        if !self.voice_supported {
            return vec![SessionEffect::Notice(Notice::VoiceUnsupported)];
        }
        if self.mic_permission == MicPermission::Denied {
            return vec![SessionEffect::Notice(Notice::MicrophoneUnavailable)];
        }
        vec![SessionEffect::RequestMicrophone]
    }

    pub fn microphone_result(&mut self, granted: bool) -> Vec<SessionEffect> {
        if !granted {
            self.mic_permission = MicPermission::Denied;
            return vec![SessionEffect::Notice(Notice::MicrophoneUnavailable)];
        }
        self.mic_permission = MicPermission::Granted;
        self.voice_mode = true;
        self.audio_enabled = true;
        self.listening = true;
        vec![SessionEffect::StartCapture]
    }

    pub fn toggle_listening(&mut self) -> Vec<SessionEffect> {
        if !self.voice_supported {
            return Vec::new();
        }
        if self.listening {
            self.listening = false;
            self.interim_transcript.clear();
            vec![SessionEffect::AbortCapture]
        } else {
            self.listening = true;
            vec![SessionEffect::StartCapture]
        }
    }

    pub fn toggle_audio(&mut self) -> Vec<SessionEffect> {
        self.audio_enabled = !self.audio_enabled;
        if !self.audio_enabled && self.speaking {
            self.speaking = false;
            return vec![SessionEffect::CancelSpeech];
        }
        Vec::new()
    }

    /// Accept picked files as pending attachments. Each rejected file raises
    /// its own notice; the rest are still accepted.
    pub fn add_files(&mut self, files: &[&dyn FileSource]) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        for file in files {
            match accept_file(*file) {
                Ok(attachment) => self.pending_attachments.push(attachment),
                Err(err) => {
                    log::info!("attachment rejected: {err}");
                    effects.push(SessionEffect::Notice(Notice::AttachmentRejected(err)));
                }
            }
        }
        effects
    }

    pub fn remove_attachment(&mut self, id: &str) -> Vec<SessionEffect> {
        let Some(index) = self.pending_attachments.iter().position(|a| a.id == id) else {
            return Vec::new();
        };
        let removed = self.pending_attachments.remove(index);
        vec![SessionEffect::Revoke(removed.url)]
    }

    fn capture_context(&self) -> ConversationContext {
        ConversationContext::capture(
            &self.assistant_id,
            &self.assistant_name,
            self.messages.clone(),
            self.analyses.clone(),
        )
    }

    /// Snapshot the conversation into a new context. No-op without messages.
    pub fn save_context(&mut self) -> Vec<SessionEffect> {
        if self.messages.is_empty() {
            return Vec::new();
        }
        self.context_saved = true;
        vec![
            SessionEffect::SaveContext(self.capture_context()),
            self.schedule(SAVED_FLAG_DURATION, TimerEvent::ClearSavedFlag),
        ]
    }

    /// Commit the conversation, stop all speech and start over.
    pub fn reset(&mut self) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        let saved = !self.messages.is_empty();
        if saved {
            effects.push(SessionEffect::SaveContext(self.capture_context()));
        }

        self.voice_mode = false;
        self.listening = false;
        self.speaking = false;
        self.interim_transcript.clear();
        effects.push(SessionEffect::AbortCapture);
        effects.push(SessionEffect::CancelSpeech);

        effects.extend(self.attachment_urls().into_iter().map(SessionEffect::Revoke));

        self.messages.clear();
        self.pending_attachments.clear();
        self.analyses.clear();
        self.in_flight.clear();
        self.typing = false;
        self.analyzing = false;
        self.epoch += 1;

        self.context_saved = saved;
        if saved {
            effects.push(self.schedule(SAVED_FLAG_DURATION, TimerEvent::ClearSavedFlag));
        }
        effects
    }
}
