use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn attachment(file_type: FileType) -> ChatAttachment {
    ChatAttachment {
        id: "file-1".to_owned(),
        name: "sample".to_owned(),
        file_type,
        size: 1024,
        url: "blob:x".to_owned(),
        mime_type: "application/octet-stream".to_owned(),
    }
}

// =============================================================
// Shape per file type
// =============================================================

#[test]
fn pdf_has_words_and_pages_but_no_duration() {
    let mut rng = StdRng::seed_from_u64(11);
    let analysis = fake_analysis(&attachment(FileType::Pdf), Language::Spanish, &mut rng);
    assert!(summaries(FileType::Pdf).contains(&analysis.summary.as_str()));
    let words = analysis.word_count.unwrap();
    assert!((500..5500).contains(&words));
    let pages = analysis.page_count.unwrap();
    assert!((1..=20).contains(&pages));
    assert_eq!(analysis.duration, None);
}

#[test]
fn image_has_no_word_count() {
    let mut rng = StdRng::seed_from_u64(12);
    let analysis = fake_analysis(&attachment(FileType::Image), Language::English, &mut rng);
    assert_eq!(analysis.word_count, None);
    assert_eq!(analysis.page_count, None);
    assert_eq!(analysis.language.as_deref(), Some("Inglés"));
}

#[test]
fn video_has_minutes_seconds_duration() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..20 {
        let analysis = fake_analysis(&attachment(FileType::Video), Language::Spanish, &mut rng);
        assert_eq!(analysis.word_count, None);
        let duration = analysis.duration.unwrap();
        let (minutes, seconds) = duration.split_once(':').unwrap();
        let minutes: u32 = minutes.parse().unwrap();
        assert!((1..=10).contains(&minutes));
        assert_eq!(seconds.len(), 2);
        assert!(seconds.parse::<u32>().unwrap() < 60);
    }
}

// =============================================================
// Sampling
// =============================================================

#[test]
fn key_points_and_entities_are_distinct_samples() {
    let mut rng = StdRng::seed_from_u64(14);
    for _ in 0..50 {
        let analysis = fake_analysis(&attachment(FileType::Text), Language::Portuguese, &mut rng);
        assert!((3..=5).contains(&analysis.key_points.len()));
        assert!((2..=4).contains(&analysis.entities.len()));
        let mut points = analysis.key_points.clone();
        points.sort();
        points.dedup();
        assert_eq!(points.len(), analysis.key_points.len());
        assert!(analysis.sentiment.is_some());
    }
}

#[test]
fn analysis_links_back_to_file() {
    let mut rng = StdRng::seed_from_u64(15);
    let analysis = fake_analysis(&attachment(FileType::Other), Language::Spanish, &mut rng);
    assert_eq!(analysis.file_id, "file-1");
    assert_eq!(analysis.file_name, "sample");
    assert_eq!(analysis.summary, "Archivo con contenido relevante para análisis.");
    assert!(analysis.id.starts_with("analysis-"));
}
