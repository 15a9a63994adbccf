use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::sim::Simulator;
use crate::state::assistant::seed_assistants;
use crate::state::assistants::AssistantsState;
use crate::state::chat::{ChatRole, MAX_ATTACHMENT_BYTES};
use crate::util::storage::MemoryStorage;

struct Canned;

impl ResponseSource for Canned {
    fn pick(&self, _language: Language, _objective: Option<Objective>, _rng: &mut dyn RngCore) -> String {
        "respuesta".to_owned()
    }

    fn attachment_remark(&self, _language: Language, _rng: &mut dyn RngCore) -> String {
        "He revisado tus archivos.".to_owned()
    }
}

struct FakeFile {
    name: String,
    size: u64,
}

impl FakeFile {
    fn new(name: &str, size: u64) -> Self {
        Self {
            name: name.to_owned(),
            size,
        }
    }
}

impl FileSource for FakeFile {
    fn name(&self) -> String {
        self.name.clone()
    }
    fn mime_type(&self) -> String {
        "application/pdf".to_owned()
    }
    fn size(&self) -> u64 {
        self.size
    }
    fn object_url(&self) -> Option<String> {
        Some(format!("blob:{}", self.name))
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(99)
}

/// Spanish sales assistant with audio output switched off.
fn quiet_session() -> ChatSession {
    let mut assistant = seed_assistants().remove(0);
    assistant.audio_enabled = false;
    ChatSession::new(&assistant, true)
}

fn schedules(effects: &[SessionEffect]) -> Vec<(Duration, u64, TimerEvent)> {
    effects
        .iter()
        .filter_map(|e| match e {
            SessionEffect::Schedule { after, epoch, event } => Some((*after, *epoch, *event)),
            _ => None,
        })
        .collect()
}

fn fire(session: &mut ChatSession, effects: &[SessionEffect], rng: &mut StdRng) -> Vec<SessionEffect> {
    let (_, epoch, event) = schedules(effects)[0];
    session.on_timer(epoch, event, &Canned, &Simulator, rng)
}

// =============================================================
// Submit
// =============================================================

#[test]
fn new_session_is_idle_and_mirrors_assistant() {
    let session = ChatSession::new(&seed_assistants()[0], false);
    assert!(session.is_idle());
    assert!(session.audio_enabled);
    assert!(!session.voice_mode);
    assert_eq!(session.language(), Language::Spanish);
}

#[test]
fn blank_submit_is_ignored() {
    let mut session = quiet_session();
    assert!(session.submit("   ", &mut rng()).is_empty());
    assert!(session.messages.is_empty());
}

#[test]
fn submit_appends_user_message_and_schedules_reply() {
    let mut session = quiet_session();
    let mut rng = rng();
    let effects = session.submit("  hola  ", &mut rng);

    assert_eq!(session.messages.len(), 1);
    assert_eq!(session.messages[0].content, "hola");
    assert_eq!(session.messages[0].role, ChatRole::User);
    assert!(session.typing);

    let timers = schedules(&effects);
    assert_eq!(timers.len(), 1);
    let (after, epoch, event) = timers[0];
    assert_eq!(event, TimerEvent::ReplyReady { with_files: false });
    assert_eq!(epoch, session.epoch());
    assert!(after >= Duration::from_millis(1000) && after <= Duration::from_millis(2000));
}

#[test]
fn submit_while_typing_is_ignored() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.submit("uno", &mut rng);
    assert!(session.submit("dos", &mut rng).is_empty());
    assert_eq!(session.messages.len(), 1);
}

#[test]
fn reply_is_appended_and_typing_cleared() {
    let mut session = quiet_session();
    let mut rng = rng();
    let effects = session.submit("hola", &mut rng);
    let after_reply = fire(&mut session, &effects, &mut rng);

    assert!(after_reply.is_empty());
    assert!(!session.typing);
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[1].role, ChatRole::Assistant);
    assert_eq!(session.messages[1].content, "respuesta");
}

#[test]
fn reply_is_spoken_when_audio_enabled() {
    let mut session = ChatSession::new(&seed_assistants()[0], true);
    let mut rng = rng();
    let effects = session.submit("hola", &mut rng);
    let after_reply = fire(&mut session, &effects, &mut rng);
    assert_eq!(
        after_reply,
        vec![SessionEffect::Speak {
            text: "respuesta".to_owned(),
            lang: "es-ES",
        }]
    );
}

#[test]
fn simulator_reply_comes_from_objective_table() {
    let mut session = quiet_session();
    let mut rng = rng();
    let effects = session.submit("hola", &mut rng);
    let (_, epoch, event) = schedules(&effects)[0];
    session.on_timer(epoch, event, &Simulator, &Simulator, &mut rng);
    let reply = &session.messages[1].content;
    let sales = crate::sim::responses::candidates_in(crate::sim::responses::RESPONSES, Language::Spanish, Some(Objective::Sales));
    assert!(sales.contains(&reply.as_str()));
}

// =============================================================
// Attachments
// =============================================================

#[test]
fn oversized_files_are_rejected_individually() {
    let mut session = quiet_session();
    let ok = FakeFile::new("a.pdf", 10);
    let big = FakeFile::new("big.pdf", MAX_ATTACHMENT_BYTES + 1);
    let also_ok = FakeFile::new("b.pdf", 20);
    let effects = session.add_files(&[&ok, &big, &also_ok]);

    assert_eq!(session.pending_attachments.len(), 2);
    assert_eq!(
        effects,
        vec![SessionEffect::Notice(Notice::AttachmentRejected(AttachmentError::TooLarge {
            name: "big.pdf".to_owned()
        }))]
    );
}

#[test]
fn removing_pending_attachment_revokes_its_url() {
    let mut session = quiet_session();
    session.add_files(&[&FakeFile::new("a.pdf", 10)]);
    let id = session.pending_attachments[0].id.clone();
    assert_eq!(session.remove_attachment(&id), vec![SessionEffect::Revoke("blob:a.pdf".to_owned())]);
    assert!(session.pending_attachments.is_empty());
    assert!(session.remove_attachment(&id).is_empty());
}

#[test]
fn attachment_only_message_goes_through_analysis() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.add_files(&[&FakeFile::new("a.pdf", 10), &FakeFile::new("b.pdf", 10)]);
    let effects = session.submit("", &mut rng);

    assert_eq!(session.messages[0].content, ATTACHMENTS_ONLY_TEXT);
    assert_eq!(session.messages[0].attachment_list().len(), 2);
    assert!(session.pending_attachments.is_empty());
    assert!(session.analyzing && session.typing);
    let (after, _, event) = schedules(&effects)[0];
    assert_eq!(event, TimerEvent::AnalysisDone);
    assert!(after >= Duration::from_millis(2000) && after <= Duration::from_millis(3500));

    let analyzed = fire(&mut session, &effects, &mut rng);
    let recorded = analyzed
        .iter()
        .filter(|e| matches!(e, SessionEffect::RecordAnalysis(_)))
        .count();
    assert_eq!(recorded, 2);
    assert_eq!(session.analyses.len(), 2);
    assert!(!session.analyzing);
    assert!(session.typing);
    assert_eq!(schedules(&analyzed)[0].2, TimerEvent::ReplyReady { with_files: true });

    fire(&mut session, &analyzed, &mut rng);
    assert_eq!(session.messages[1].content, "He revisado tus archivos. respuesta");
}

// =============================================================
// Reset
// =============================================================

#[test]
fn reset_commits_one_context_and_revokes_each_url_once() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.add_files(&[&FakeFile::new("sent.pdf", 10)]);
    let effects = session.submit("mira esto", &mut rng);
    let analyzed = fire(&mut session, &effects, &mut rng);
    fire(&mut session, &analyzed, &mut rng);
    session.add_files(&[&FakeFile::new("pending.pdf", 10)]);
    let n = session.messages.len();

    let effects = session.reset();
    let contexts: Vec<&ConversationContext> = effects
        .iter()
        .filter_map(|e| match e {
            SessionEffect::SaveContext(ctx) => Some(ctx),
            _ => None,
        })
        .collect();
    assert_eq!(contexts.len(), 1);
    assert_eq!(contexts[0].messages.len(), n);
    assert_eq!(contexts[0].file_analyses.len(), 1);

    let mut revoked: Vec<&str> = effects
        .iter()
        .filter_map(|e| match e {
            SessionEffect::Revoke(url) => Some(url.as_str()),
            _ => None,
        })
        .collect();
    revoked.sort_unstable();
    assert_eq!(revoked, vec!["blob:pending.pdf", "blob:sent.pdf"]);

    assert!(effects.contains(&SessionEffect::AbortCapture));
    assert!(effects.contains(&SessionEffect::CancelSpeech));
    assert!(session.messages.is_empty());
    assert!(session.pending_attachments.is_empty());
    assert!(session.analyses.is_empty());
    assert!(session.context_saved);
}

#[test]
fn reset_without_messages_saves_nothing() {
    let mut session = quiet_session();
    let effects = session.reset();
    assert!(!effects.iter().any(|e| matches!(e, SessionEffect::SaveContext(_))));
    assert!(!session.context_saved);
}

#[test]
fn timers_from_before_reset_are_dropped() {
    let mut session = quiet_session();
    let mut rng = rng();
    let effects = session.submit("hola", &mut rng);
    session.reset();
    let late = fire(&mut session, &effects, &mut rng);
    assert!(late.is_empty());
    assert!(session.messages.is_empty());
    assert!(!session.typing);
}

#[test]
fn saved_flag_clears_after_reset_timer() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.submit("hola", &mut rng);
    let effects = session.reset();
    fire(&mut session, &effects, &mut rng);
    assert!(!session.context_saved);
}

// =============================================================
// Save context
// =============================================================

#[test]
fn save_context_requires_messages() {
    let mut session = quiet_session();
    assert!(session.save_context().is_empty());
    assert!(!session.context_saved);
}

#[test]
fn save_context_flags_for_two_seconds() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.submit("quiero comprar el producto, gracias", &mut rng);
    let effects = session.save_context();
    assert!(session.context_saved);
    match &effects[0] {
        SessionEffect::SaveContext(ctx) => {
            assert_eq!(ctx.assistant_name, "Asistente de Ventas");
            assert!(ctx.topics.contains(&"comprar".to_owned()));
            assert!(ctx.lead_score.unwrap() > 50);
        }
        other => panic!("expected SaveContext, got {other:?}"),
    }
    let (after, _, event) = schedules(&effects)[0];
    assert_eq!((after, event), (SAVED_FLAG_DURATION, TimerEvent::ClearSavedFlag));
    assert_eq!(session.messages.len(), 1);
}

// =============================================================
// Voice mode
// =============================================================

#[test]
fn voice_mode_on_unsupported_platform_raises_notice() {
    let mut assistant = seed_assistants().remove(0);
    assistant.audio_enabled = false;
    let mut session = ChatSession::new(&assistant, false);
    assert_eq!(session.toggle_voice_mode(), vec![SessionEffect::Notice(Notice::VoiceUnsupported)]);
    assert!(!session.voice_mode);
    assert!(session.toggle_listening().is_empty());
}

#[test]
fn voice_mode_requests_microphone_then_starts_capture() {
    let mut session = quiet_session();
    assert_eq!(session.toggle_voice_mode(), vec![SessionEffect::RequestMicrophone]);
    assert!(!session.voice_mode);

    assert_eq!(session.microphone_result(true), vec![SessionEffect::StartCapture]);
    assert!(session.voice_mode);
    assert!(session.audio_enabled);
    assert!(session.listening);
    assert_eq!(session.mic_permission, MicPermission::Granted);

    assert_eq!(
        session.toggle_voice_mode(),
        vec![SessionEffect::AbortCapture, SessionEffect::CancelSpeech]
    );
    assert!(!session.voice_mode && !session.listening);
}

#[test]
fn denied_microphone_is_sticky_until_permission_changes() {
    let mut session = quiet_session();
    session.toggle_voice_mode();
    assert_eq!(
        session.microphone_result(false),
        vec![SessionEffect::Notice(Notice::MicrophoneUnavailable)]
    );
    assert_eq!(
        session.toggle_voice_mode(),
        vec![SessionEffect::Notice(Notice::MicrophoneUnavailable)]
    );
    session.on_permission_change(MicPermission::Prompt);
    assert_eq!(session.toggle_voice_mode(), vec![SessionEffect::RequestMicrophone]);
}

#[test]
fn permission_denied_during_capture_disables_voice_mode() {
    let mut session = quiet_session();
    session.microphone_result(true);
    let effects = session.on_speech_input(SpeechInputEvent::Error(CaptureError::NotAllowed), &mut rng());
    assert_eq!(effects, vec![SessionEffect::Notice(Notice::MicrophoneBlocked)]);
    assert!(!session.voice_mode);
    assert!(!session.listening);
    assert_eq!(session.mic_permission, MicPermission::Denied);
}

#[test]
fn no_speech_restarts_capture_quickly() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.microphone_result(true);
    let effects = session.on_speech_input(SpeechInputEvent::Error(CaptureError::NoSpeech), &mut rng);
    let (after, _, event) = schedules(&effects)[0];
    assert_eq!((after, event), (RESTART_CAPTURE, TimerEvent::ResumeCapture));
    assert_eq!(fire(&mut session, &effects, &mut rng), vec![SessionEffect::StartCapture]);
}

#[test]
fn aborted_is_ignored_and_other_errors_stop_listening() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.microphone_result(true);
    assert!(session
        .on_speech_input(SpeechInputEvent::Error(CaptureError::Aborted), &mut rng)
        .is_empty());
    assert!(session.listening);

    session.on_speech_input(SpeechInputEvent::Error(CaptureError::Other("network".to_owned())), &mut rng);
    assert!(!session.listening);
    assert!(session.voice_mode);
}

#[test]
fn capture_end_restarts_only_in_voice_mode() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.listening = true;
    assert!(session.on_speech_input(SpeechInputEvent::Ended, &mut rng).is_empty());
    assert!(!session.listening);

    session.microphone_result(true);
    let effects = session.on_speech_input(SpeechInputEvent::Ended, &mut rng);
    assert_eq!(schedules(&effects)[0].0, RESTART_CAPTURE);
}

#[test]
fn final_transcript_becomes_audio_message() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.on_speech_input(SpeechInputEvent::Interim("quiero".to_owned()), &mut rng);
    assert_eq!(session.interim_transcript, "quiero");

    let effects = session.on_speech_input(SpeechInputEvent::Final(" quiero comprar ".to_owned()), &mut rng);
    assert!(session.interim_transcript.is_empty());
    assert_eq!(session.messages[0].content, "quiero comprar");
    assert_eq!(session.messages[0].is_audio, Some(true));
    assert!(session.typing);
    assert_eq!(schedules(&effects)[0].2, TimerEvent::ReplyReady { with_files: false });
}

#[test]
fn silent_reply_in_voice_mode_resumes_capture_after_half_second() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.microphone_result(true);
    session.audio_enabled = false;
    let effects = session.on_speech_input(SpeechInputEvent::Final("hola".to_owned()), &mut rng);
    let after_reply = fire(&mut session, &effects, &mut rng);
    let (after, _, event) = schedules(&after_reply)[0];
    assert_eq!((after, event), (RESUME_AFTER_REPLY, TimerEvent::ResumeCapture));
}

#[test]
fn playback_end_resumes_capture_in_voice_mode() {
    let mut session = quiet_session();
    let mut rng = rng();
    session.microphone_result(true);
    session.on_speech_output(SpeechOutputEvent::Started);
    assert!(session.speaking);

    let effects = session.on_speech_output(SpeechOutputEvent::Ended);
    assert!(!session.speaking);
    let (after, _, event) = schedules(&effects)[0];
    assert_eq!((after, event), (RESUME_AFTER_SPEECH, TimerEvent::ResumeCapture));
    assert_eq!(fire(&mut session, &effects, &mut rng), vec![SessionEffect::StartCapture]);
}

#[test]
fn playback_end_outside_voice_mode_does_nothing() {
    let mut session = quiet_session();
    session.on_speech_output(SpeechOutputEvent::Started);
    assert!(session.on_speech_output(SpeechOutputEvent::Ended).is_empty());
}

// =============================================================
// Direct toggles
// =============================================================

#[test]
fn toggle_listening_starts_and_aborts_capture() {
    let mut session = quiet_session();
    assert_eq!(session.toggle_listening(), vec![SessionEffect::StartCapture]);
    assert!(session.listening);
    assert_eq!(session.toggle_listening(), vec![SessionEffect::AbortCapture]);
    assert!(!session.listening);
}

#[test]
fn muting_audio_cancels_playback() {
    let mut session = ChatSession::new(&seed_assistants()[0], true);
    session.on_speech_output(SpeechOutputEvent::Started);
    assert_eq!(session.toggle_audio(), vec![SessionEffect::CancelSpeech]);
    assert!(!session.audio_enabled && !session.speaking);
    assert!(session.toggle_audio().is_empty());
    assert!(session.audio_enabled);
}

// =============================================================
// Assistant edits and teardown
// =============================================================

#[test]
fn saved_objective_drives_the_next_reply() {
    let storage = MemoryStorage::new();
    let mut repo = AssistantsState::default();
    repo.hydrate(&storage).unwrap();
    let stored = repo.get("assistant-1").cloned().unwrap();
    assert_eq!(stored.training_config.objective, Objective::Sales);
    let mut session = ChatSession::new(&stored, false);
    let mut rng = rng();
    let effects = session.submit("hola", &mut rng);
    fire(&mut session, &effects, &mut rng);

    let mut config = stored.training_config;
    config.objective = Objective::Support;
    repo.update_training_config(&storage, "assistant-1", config).unwrap();
    session.sync_assistant(repo.get("assistant-1").unwrap());
    assert_eq!(session.messages.len(), 2);

    let effects = session.submit("hola", &mut rng);
    let (_, epoch, event) = schedules(&effects)[0];
    session.on_timer(epoch, event, &Simulator, &Simulator, &mut rng);
    let reply = &session.messages[3].content;
    let support =
        crate::sim::responses::candidates_in(crate::sim::responses::RESPONSES, Language::Spanish, Some(Objective::Support));
    assert!(support.contains(&reply.as_str()));
}

#[test]
fn attachment_urls_lists_pending_and_sent_once() {
    let mut session = quiet_session();
    let mut rng = rng();
    assert!(session.attachment_urls().is_empty());
    session.add_files(&[&FakeFile::new("sent.pdf", 10)]);
    let effects = session.submit("mira esto", &mut rng);
    let analyzed = fire(&mut session, &effects, &mut rng);
    fire(&mut session, &analyzed, &mut rng);
    session.add_files(&[&FakeFile::new("pending.pdf", 10), &FakeFile::new("pending.pdf", 12)]);

    let mut urls = session.attachment_urls();
    urls.sort_unstable();
    assert_eq!(urls, vec!["blob:pending.pdf".to_owned(), "blob:sent.pdf".to_owned()]);
    assert_eq!(session.messages.len(), 2);
}
