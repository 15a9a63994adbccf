//! Keyword-based conversation analytics: topics, sentiment and lead score.

#[cfg(test)]
#[path = "analytics_test.rs"]
mod analytics_test;

use crate::state::chat::ChatMessage;
use crate::state::insights::Sentiment;

const TOPIC_KEYWORDS: &[&str] = &[
    "precio",
    "costo",
    "producto",
    "servicio",
    "ayuda",
    "problema",
    "comprar",
    "información",
    "contacto",
    "soporte",
    "venta",
    "oferta",
    "descuento",
    "envío",
    "pago",
];

const POSITIVE_KEYWORDS: &[&str] = &[
    "gracias",
    "excelente",
    "perfecto",
    "genial",
    "bueno",
    "bien",
    "encanta",
    "feliz",
    "satisfecho",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "problema",
    "mal",
    "error",
    "queja",
    "molesto",
    "terrible",
    "peor",
    "nunca",
    "horrible",
];

const BUYING_KEYWORDS: &[&str] = &["comprar", "precio", "costo", "pagar", "adquirir", "contratar"];

const MAX_TOPICS: usize = 5;

/// Up to five topic keywords, in the order they first appear across messages.
#[must_use]
pub fn extract_topics(messages: &[ChatMessage]) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    for message in messages {
        let text = message.content.to_lowercase();
        for keyword in TOPIC_KEYWORDS {
            if text.contains(keyword) && !topics.iter().any(|t| t == keyword) {
                topics.push((*keyword).to_owned());
            }
        }
    }
    topics.truncate(MAX_TOPICS);
    topics
}

fn keyword_hits(text: &str, keywords: &[&str]) -> i32 {
    let hits = keywords.iter().filter(|k| text.contains(*k)).count();
    i32::try_from(hits).unwrap_or(i32::MAX)
}

/// +1 per positive keyword present, -1 per negative one, summed over messages.
#[must_use]
pub fn sentiment_score(messages: &[ChatMessage]) -> i32 {
    messages
        .iter()
        .map(|m| {
            let text = m.content.to_lowercase();
            keyword_hits(&text, POSITIVE_KEYWORDS) - keyword_hits(&text, NEGATIVE_KEYWORDS)
        })
        .sum()
}

#[must_use]
pub fn analyze_sentiment(messages: &[ChatMessage]) -> Sentiment {
    match sentiment_score(messages) {
        s if s > 1 => Sentiment::Positive,
        s if s < -1 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// Lead score in `0..=100` from engagement, sentiment and buying intent.
///
/// Starts at 50, adds 3 per message (capped at 20), 15 for a positive or -10
/// for a negative conversation, and 5 per buying keyword found in each
/// message.
#[must_use]
pub fn lead_score(messages: &[ChatMessage]) -> u8 {
    let engagement = i32::try_from(messages.len()).unwrap_or(i32::MAX).saturating_mul(3).min(20);
    let mood = match analyze_sentiment(messages) {
        Sentiment::Positive => 15,
        Sentiment::Negative => -10,
        Sentiment::Neutral => 0,
    };
    let intent: i32 = messages
        .iter()
        .map(|m| keyword_hits(&m.content.to_lowercase(), BUYING_KEYWORDS) * 5)
        .sum();
    let score = (50 + engagement + mood).saturating_add(intent).clamp(0, 100);
    u8::try_from(score).unwrap_or(100)
}
