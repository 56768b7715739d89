//! Static keyword tables for the scorer.
//!
//! Weights are matched as case-insensitive substrings against the
//! lowercased, trimmed message. Positive weight is capped by the
//! scorer; negative weight is not.

/// Buying-signal phrases and their weights.
pub static POSITIVE_KEYWORDS: &[(&str, i32)] = &[
    // Need / urgency
    ("necesito", 15),
    ("requiero", 15),
    ("urgente", 20),
    ("crítico", 20),
    ("problema", 10),
    ("solución", 15),
    // Budget / commitment
    ("presupuesto", 25),
    ("inversión", 25),
    ("invertir", 20),
    ("contrato", 25),
    ("servicio", 10),
    ("empresa", 5),
    // Automation interest
    ("automatizar", 20),
    ("automatización", 20),
    ("eficiencia", 15),
    ("proceso", 15),
    ("manual", 10),
    ("repetitivo", 15),
    // Security interest
    ("seguridad", 15),
    ("ransomware", 20),
    ("virus", 15),
    ("protección", 15),
    ("backup", 15),
    ("ciberseguridad", 15),
    // Timeline
    ("rápido", 15),
    ("esta semana", 20),
    ("este mes", 15),
    ("cuanto antes", 15),
    // Business context
    ("factura", 15),
    ("email", 10),
    ("cliente", 10),
    ("datos", 10),
    ("base de datos", 15),
];

/// Disqualifying phrases. These sums are applied without a cap so a
/// single strong hit can sink the score.
pub static NEGATIVE_KEYWORDS: &[(&str, i32)] = &[
    ("spam", -100),
    ("scam", -100),
    ("broma", -50),
    ("solo curioso", -30),
    ("prueba", -20),
    ("no sé", -15),
    ("información", -5),
];

/// Technical terms that mark a specific, informed request.
pub static TECHNICAL_TERMS: &[&str] = &[
    "api",
    "python",
    "zapier",
    "n8n",
    "make",
    "automate",
    "windows",
    "linux",
    "sql",
    "excel",
    "google sheets",
];

/// Timeline words that mark urgency.
pub static URGENCY_TERMS: &[&str] = &[
    "mañana",
    "esta semana",
    "este mes",
    "urgente",
    "asap",
    "pronto",
    "rápido",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lowercase() {
        for (kw, _) in POSITIVE_KEYWORDS.iter().chain(NEGATIVE_KEYWORDS) {
            assert_eq!(*kw, kw.to_lowercase());
        }
        for term in TECHNICAL_TERMS.iter().chain(URGENCY_TERMS) {
            assert_eq!(*term, term.to_lowercase());
        }
    }

    #[test]
    fn test_positive_weights_in_range() {
        for (_, w) in POSITIVE_KEYWORDS {
            assert!((5..=25).contains(w));
        }
    }

    #[test]
    fn test_negative_weights_are_negative() {
        for (_, w) in NEGATIVE_KEYWORDS {
            assert!(*w < 0);
        }
    }
}
