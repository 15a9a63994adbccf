//! Canned reply tables.

#[cfg(test)]
#[path = "responses_test.rs"]
mod responses_test;

use rand::RngCore;
use rand::seq::IndexedRandom;

use crate::state::assistant::{Language, Objective};

/// Candidates for one objective; `None` is the language's default list.
pub type ObjectiveTable = &'static [(Option<Objective>, &'static [&'static str])];

/// Language -> objective -> candidate replies.
pub type ResponseTable = &'static [(Language, ObjectiveTable)];

pub const RESPONSES: ResponseTable = &[
    (
        Language::Spanish,
        &[
            (
                Some(Objective::Sales),
                &[
                    "¡Hola! Estoy aquí para ayudarte a encontrar el producto perfecto. ¿Qué estás buscando hoy?",
                    "Excelente elección. Este producto tiene un 20% de descuento esta semana. ¿Te gustaría conocer más detalles?",
                    "Basándome en tus preferencias, te recomiendo nuestro plan Premium. Incluye todas las funcionalidades que necesitas.",
                    "Entiendo tu presupuesto. Tenemos opciones flexibles de pago. ¿Te gustaría que te explique las alternativas?",
                    "Muchos clientes como tú han elegido esta solución y están muy satisfechos. ¿Quieres que te cuente sus experiencias?",
                    "¡Perfecto! Puedo agendar una demostración personalizada para ti. ¿Qué horario te conviene mejor?",
                    "Este producto resuelve exactamente el problema que mencionas. ¿Te gustaría probarlo gratis por 14 días?",
                ],
            ),
            (
                Some(Objective::Support),
                &[
                    "Entiendo tu problema. Vamos a resolverlo juntos. ¿Podrías darme más detalles sobre el error?",
                    "He identificado el problema. Te guiaré paso a paso para solucionarlo.",
                    "Gracias por tu paciencia. He escalado tu caso a un especialista que te contactará en breve.",
                    "El problema que describes es común y tiene una solución rápida. Sigue estos pasos...",
                    "He revisado tu cuenta y todo parece estar en orden. ¿Podrías intentar cerrar sesión y volver a entrar?",
                    "Lamento los inconvenientes. Estoy generando un ticket de soporte prioritario para ti.",
                ],
            ),
            (
                Some(Objective::Marketing),
                &[
                    "¡Tenemos una promoción especial para ti! 30% de descuento en tu primera compra.",
                    "¿Sabías que nuestros clientes ahorran en promedio un 40% con nuestras soluciones?",
                    "Te invito a nuestro webinar gratuito donde aprenderás estrategias exclusivas.",
                    "Basándome en tu perfil, creo que te interesaría conocer nuestra nueva línea de productos.",
                    "¡Únete a nuestra comunidad! Miles de profesionales ya están aprovechando nuestros recursos.",
                ],
            ),
            (
                Some(Objective::Automation),
                &[
                    "Puedo ayudarte a automatizar ese proceso. ¿Cuántas veces al día realizas esta tarea?",
                    "He configurado una automatización que te ahorrará 5 horas semanales.",
                    "Tu flujo de trabajo está optimizado. Recibirás notificaciones automáticas cuando haya actualizaciones.",
                    "La integración está lista. Ahora tus datos se sincronizarán automáticamente.",
                    "He detectado un patrón en tus tareas. ¿Te gustaría que lo automatice?",
                ],
            ),
            (
                Some(Objective::LeadGen),
                &[
                    "¡Bienvenido! Me encantaría conocer más sobre tu negocio. ¿A qué te dedicas?",
                    "Interesante. ¿Cuál es el principal desafío que enfrentas actualmente?",
                    "Tenemos soluciones específicas para tu industria. ¿Te gustaría una consulta gratuita?",
                    "¿Cuál es el tamaño de tu equipo? Así puedo recomendarte el plan más adecuado.",
                    "Déjame tu email y te enviaré información personalizada sobre cómo podemos ayudarte.",
                ],
            ),
            (
                None,
                &[
                    "¡Hola! Estoy aquí para ayudarte. ¿En qué puedo asistirte hoy?",
                    "Entiendo tu consulta. Déjame analizar la mejor solución para ti.",
                    "Excelente pregunta. Basándome en mi entrenamiento, te recomendaría...",
                    "Gracias por tu paciencia. He procesado tu solicitud correctamente.",
                    "Eso es muy interesante. ¿Podrías darme más detalles al respecto?",
                    "Perfecto, he tomado nota de tu requerimiento. ¿Hay algo más en lo que pueda ayudarte?",
                ],
            ),
        ],
    ),
    (
        Language::English,
        &[
            (
                Some(Objective::Sales),
                &[
                    "Hi! I'm here to help you find the perfect product. What are you looking for today?",
                    "Great choice! This product has a 20% discount this week. Would you like more details?",
                    "Based on your preferences, I recommend our Premium plan. It includes all the features you need.",
                    "I understand your budget. We have flexible payment options. Would you like me to explain?",
                    "Many customers like you have chosen this solution and are very satisfied. Want to hear their experiences?",
                ],
            ),
            (
                Some(Objective::Support),
                &[
                    "I understand your issue. Let's solve it together. Could you give me more details about the error?",
                    "I've identified the problem. I'll guide you step by step to fix it.",
                    "Thank you for your patience. I've escalated your case to a specialist who will contact you shortly.",
                    "The issue you describe is common and has a quick solution. Follow these steps...",
                ],
            ),
            (
                None,
                &[
                    "Hello! I'm here to help you. How can I assist you today?",
                    "I understand your query. Let me analyze the best solution for you.",
                    "Great question. Based on my training, I would recommend...",
                    "Thank you for your patience. I have processed your request successfully.",
                    "That is very interesting. Could you provide more details about it?",
                ],
            ),
        ],
    ),
    (
        Language::Portuguese,
        &[
            (
                Some(Objective::Sales),
                &[
                    "Olá! Estou aqui para ajudá-lo a encontrar o produto perfeito. O que você está procurando hoje?",
                    "Ótima escolha! Este produto tem 20% de desconto esta semana. Gostaria de mais detalhes?",
                    "Com base nas suas preferências, recomendo nosso plano Premium.",
                ],
            ),
            (
                None,
                &[
                    "Olá! Estou aqui para ajudá-lo. Como posso ajudá-lo hoje?",
                    "Entendo sua consulta. Deixe-me analisar a melhor solução para você.",
                    "Ótima pergunta. Com base no meu treinamento, eu recomendaria...",
                    "Obrigado pela sua paciência. Processei sua solicitação com sucesso.",
                    "Isso é muito interessante. Você poderia fornecer mais detalhes sobre isso?",
                ],
            ),
        ],
    ),
];

const ATTACHMENT_REMARKS: &[(Language, &[&str])] = &[
    (
        Language::Spanish,
        &[
            "He analizado los archivos que compartiste. Basándome en el contenido, puedo ver información relevante para tu consulta.",
            "Gracias por compartir estos documentos. Después de revisarlos, tengo algunas observaciones importantes.",
            "He procesado los archivos adjuntos. Aquí está mi análisis detallado basado en la información proporcionada.",
            "Excelente, los documentos me ayudan a entender mejor tu situación. Permíteme darte una respuesta más precisa.",
        ],
    ),
    (
        Language::English,
        &[
            "I've analyzed the files you shared. Based on the content, I can see relevant information for your query.",
            "Thank you for sharing these documents. After reviewing them, I have some important observations.",
            "I've processed the attached files. Here is my detailed analysis based on the provided information.",
            "Excellent, the documents help me better understand your situation. Let me give you a more precise answer.",
        ],
    ),
    (
        Language::Portuguese,
        &[
            "Analisei os arquivos que você compartilhou. Com base no conteúdo, posso ver informações relevantes para sua consulta.",
            "Obrigado por compartilhar esses documentos. Após revisá-los, tenho algumas observações importantes.",
            "Processei os arquivos anexados. Aqui está minha análise detalhada com base nas informações fornecidas.",
            "Excelente, os documentos me ajudam a entender melhor sua situação. Deixe-me dar uma resposta mais precisa.",
        ],
    ),
];

/// Reply shown if a table yields no candidates at all.
const LAST_RESORT: &str = "¡Hola! Estoy aquí para ayudarte. ¿En qué puedo asistirte hoy?";

/// Candidate list for `language` and `objective` in `table`.
///
/// An objective without entries, or no objective, uses the language's default
/// list; a language missing from the table uses Spanish. Either level falls
/// back to its first entry when the preferred one is absent.
#[must_use]
pub fn candidates_in(table: ResponseTable, language: Language, objective: Option<Objective>) -> &'static [&'static str] {
    let by_objective = table
        .iter()
        .find(|(lang, _)| *lang == language)
        .or_else(|| table.iter().find(|(lang, _)| *lang == Language::Spanish))
        .or_else(|| table.first())
        .map_or(&[][..], |(_, entries)| *entries);

    let lookup = |key: Option<Objective>| {
        by_objective
            .iter()
            .find(|(obj, list)| *obj == key && !list.is_empty())
            .map(|(_, list)| *list)
    };

    objective
        .and_then(|obj| lookup(Some(obj)))
        .or_else(|| lookup(None))
        .or_else(|| by_objective.first().map(|(_, list)| *list))
        .unwrap_or_default()
}

/// Uniformly random reply from `table`.
pub fn pick_from(table: ResponseTable, language: Language, objective: Option<Objective>, rng: &mut dyn RngCore) -> String {
    candidates_in(table, language, objective)
        .choose(rng)
        .copied()
        .unwrap_or(LAST_RESORT)
        .to_owned()
}

pub fn attachment_remark(language: Language, rng: &mut dyn RngCore) -> String {
    let remarks = ATTACHMENT_REMARKS
        .iter()
        .find(|(lang, _)| *lang == language)
        .or_else(|| ATTACHMENT_REMARKS.first())
        .map_or(&[][..], |(_, list)| *list);
    remarks.choose(rng).copied().unwrap_or_default().to_owned()
}
