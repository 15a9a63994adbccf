use super::*;

// =============================================================
// CaptureError::from_code
// =============================================================

#[test]
fn capture_error_codes_are_classified() {
    assert_eq!(CaptureError::from_code("not-allowed"), CaptureError::NotAllowed);
    assert_eq!(CaptureError::from_code("service-not-allowed"), CaptureError::NotAllowed);
    assert_eq!(CaptureError::from_code("no-speech"), CaptureError::NoSpeech);
    assert_eq!(CaptureError::from_code("aborted"), CaptureError::Aborted);
    assert_eq!(
        CaptureError::from_code("network"),
        CaptureError::Other("network".to_owned())
    );
}

// =============================================================
// collate_results
// =============================================================

#[test]
fn collate_splits_interim_and_final() {
    let batch = vec![
        (true, "hola ".to_owned()),
        (false, "qué ".to_owned()),
        (true, "tal".to_owned()),
        (false, "estás".to_owned()),
    ];
    let (interim, final_text) = collate_results(&batch);
    assert_eq!(interim, "qué estás");
    assert_eq!(final_text, "hola tal");
}

#[test]
fn collate_empty_batch() {
    assert_eq!(collate_results(&[]), (String::new(), String::new()));
}

// =============================================================
// NoSpeech
// =============================================================

#[test]
fn no_speech_reports_unsupported() {
    let speech = NoSpeech;
    assert!(!SpeechInput::supported(&speech));
    assert!(!SpeechOutput::supported(&speech));
    assert_eq!(speech.start(), Err(SpeechError::Unsupported));
    assert_eq!(speech.speak("hola", "es-ES"), Err(SpeechError::Unsupported));
}
