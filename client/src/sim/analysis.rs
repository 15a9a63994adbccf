//! Fake file analysis.

#[cfg(test)]
#[path = "analysis_test.rs"]
mod analysis_test;

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use crate::state::assistant::Language;
use crate::state::chat::{ChatAttachment, FileType};
use crate::state::insights::{Entity, FileAnalysis, Sentiment};
use crate::util::ids::generate_id;

fn summaries(file_type: FileType) -> &'static [&'static str] {
    match file_type {
        FileType::Pdf => &[
            "Documento PDF con información estructurada sobre productos y servicios.",
            "Contrato o acuerdo legal con términos y condiciones detallados.",
            "Informe técnico con datos estadísticos y gráficos.",
            "Manual de usuario con instrucciones paso a paso.",
        ],
        FileType::Excel => &[
            "Hoja de cálculo con datos financieros y proyecciones.",
            "Base de datos de clientes con información de contacto.",
            "Inventario de productos con precios y cantidades.",
            "Reporte de ventas con métricas de rendimiento.",
        ],
        FileType::Word => &[
            "Documento de texto con propuesta comercial.",
            "Informe ejecutivo con resumen de actividades.",
            "Plantilla de contrato personalizable.",
            "Documentación de procesos internos.",
        ],
        FileType::Image => &[
            "Imagen con contenido visual relevante para el contexto.",
            "Captura de pantalla con información importante.",
            "Fotografía de producto o servicio.",
            "Diagrama o infografía explicativa.",
        ],
        FileType::Video => &[
            "Video explicativo con demostración de producto.",
            "Grabación de reunión o presentación.",
            "Tutorial paso a paso.",
            "Contenido promocional o publicitario.",
        ],
        FileType::Text => &[
            "Archivo de texto con notas o instrucciones.",
            "Código fuente o configuración.",
            "Lista de elementos o tareas.",
            "Transcripción de conversación.",
        ],
        FileType::Other => &["Archivo con contenido relevante para análisis."],
    }
}

const KEY_POINTS: &[&str] = &[
    "Información de contacto identificada",
    "Datos numéricos relevantes encontrados",
    "Referencias a productos/servicios",
    "Fechas importantes detectadas",
    "Términos clave del negocio",
    "Métricas de rendimiento",
    "Requisitos específicos mencionados",
    "Oportunidades de mejora identificadas",
];

fn entity_pool() -> Vec<Entity> {
    let entity = |kind: &str, value: String| Entity {
        kind: kind.to_owned(),
        value,
    };
    vec![
        entity("Empresa", "Cliente Corp".to_owned()),
        entity("Persona", "Juan Pérez".to_owned()),
        entity("Email", "contacto@ejemplo.com".to_owned()),
        entity("Teléfono", "+1 234 567 890".to_owned()),
        entity("Fecha", Utc::now().format("%d/%m/%Y").to_string()),
        entity("Monto", "$1,500.00".to_owned()),
        entity("Producto", "Servicio Premium".to_owned()),
    ]
}

const SENTIMENTS: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

/// Plausible-looking analysis of `attachment`.
///
/// Picks a summary for the file type, 3-5 key points and 2-4 entities. Word
/// counts are omitted for images and video, page counts only exist for PDF and
/// Word files, and only video gets an `m:ss` duration.
pub fn fake_analysis(attachment: &ChatAttachment, language: Language, rng: &mut dyn RngCore) -> FileAnalysis {
    let file_type = attachment.file_type;
    let summary = summaries(file_type).choose(rng).copied().unwrap_or_default();

    let key_point_count = rng.random_range(3..=5);
    let key_points = KEY_POINTS
        .choose_multiple(rng, key_point_count)
        .map(|s| (*s).to_owned())
        .collect();

    let entity_count = rng.random_range(2..=4);
    let entities = entity_pool().choose_multiple(rng, entity_count).cloned().collect();

    let word_count = match file_type {
        FileType::Image | FileType::Video => None,
        _ => Some(rng.random_range(500..5500)),
    };
    let page_count = match file_type {
        FileType::Pdf | FileType::Word => Some(rng.random_range(1..=20)),
        _ => None,
    };
    let duration = (file_type == FileType::Video).then(|| {
        let minutes: u32 = rng.random_range(1..=10);
        let seconds: u32 = rng.random_range(0..60);
        format!("{minutes}:{seconds:02}")
    });

    FileAnalysis {
        id: generate_id("analysis"),
        file_id: attachment.id.clone(),
        file_name: attachment.name.clone(),
        file_type,
        analyzed_at: Utc::now(),
        summary: summary.to_owned(),
        key_points,
        entities,
        sentiment: SENTIMENTS.choose(rng).copied(),
        language: Some(language.label().to_owned()),
        word_count,
        page_count,
        duration,
        dimensions: None,
    }
}
