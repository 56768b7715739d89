//! Predefined answers for common questions.
//!
//! Matching is a bidirectional substring check over a normalized copy
//! of both sides, so "cuanto cuesta" still hits "¿Cuánto cuesta?".
//! Faster and more consistent than the LLM for the questions every
//! visitor asks.

/// Question/answer pairs, tried in order; the first match wins.
static PREDEFINED_ANSWERS: &[(&str, &str)] = &[
    (
        "¿Qué servicios ofrecen?",
        "Automatización de procesos, Seguridad IT, Soporte técnico y Consultoría. ¿Cuál te interesa?",
    ),
    (
        "¿Cuánto cuesta?",
        "Depende del alcance. Típicamente $300-500/mes (pequeño), $1000-3000/mes (mediano). ¿Qué necesitas?",
    ),
    (
        "¿En qué horarios atienden?",
        "Lunes a viernes 9-18hs. Fuera de horario por WhatsApp. ¿Necesitas ayuda?",
    ),
    (
        "¿Dónde están?",
        "Atendemos clientes de todo el país por videollamada. ¿De dónde eres?",
    ),
    (
        "¿Cuánta experiencia tienen?",
        "+20 años en IT. Últimos 4 años especializados en Python y automatización. Trabajamos con PyMEs.",
    ),
    (
        "¿Hacen soporte de PCs?",
        "No, me enfoco en infraestructura y automatización. Pero conozco gente que hace service de PC si necesitas.",
    ),
    (
        "¿Puedo probar antes de contratar?",
        "Claro. Hacemos una consulta de 30 min (gratis) donde analizo tu caso y te digo si sí o no.",
    ),
    (
        "¿Cómo empezamos?",
        "Completa nuestro formulario de asesoría rápido. En 24hs me comunico para concretar la consulta.",
    ),
    (
        "¿Ofrecen contrato?",
        "Sí, depende del tipo de proyecto. En la consulta vemos términos, plazos y garantías.",
    ),
    (
        "¿Puedo contactarte por WhatsApp?",
        "Claro, ese es mi canal preferido. Deja tu número en el formulario y te escribo.",
    ),
];

/// Look up a predefined answer for a user message. Returns `None` when
/// nothing matches and the generative path should run.
pub fn predefined_answer(message: &str) -> Option<&'static str> {
    let normalized = normalize(message);
    if normalized.is_empty() {
        return None;
    }
    for (question, answer) in PREDEFINED_ANSWERS {
        let question = normalize(question);
        if normalized.contains(&question) || question.contains(&normalized) {
            return Some(answer);
        }
    }
    None
}

/// Lowercase, trim, strip trailing question/exclamation marks and fold
/// Spanish diacritics so accent-free typing still matches.
fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let stripped = lowered.trim_end_matches(['?', '!']).trim();
    stripped
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_question() {
        let answer = predefined_answer("¿Cuánto cuesta?");
        assert!(answer.is_some());
        assert!(answer.is_some_and(|a| a.contains("$300-500")));
    }

    #[test]
    fn test_unaccented_input_matches() {
        assert_eq!(predefined_answer("cuanto cuesta"), predefined_answer("¿Cuánto cuesta?"));
        assert!(predefined_answer("cuanto cuesta").is_some());
    }

    #[test]
    fn test_longer_message_containing_question() {
        // User text contains the normalized table question.
        let answer = predefined_answer("hola, ¿en qué horarios atienden??");
        assert!(answer.is_some_and(|a| a.contains("Lunes a viernes")));
    }

    #[test]
    fn test_first_match_wins() {
        // "que servicios ofrecen" sits inside the first table entry.
        let answer = predefined_answer("que servicios ofrecen");
        assert!(answer.is_some_and(|a| a.starts_with("Automatización")));
    }

    #[test]
    fn test_unknown_question_is_none() {
        assert_eq!(predefined_answer("¿me ayudas a migrar mi ERP a la nube?"), None);
    }

    #[test]
    fn test_empty_message_is_none() {
        assert_eq!(predefined_answer(""), None);
        assert_eq!(predefined_answer("   ?!"), None);
    }

    #[test]
    fn test_normalize_folds_diacritics() {
        assert_eq!(normalize("¿Cuánto cuesta?"), "¿cuanto cuesta");
    }
}
