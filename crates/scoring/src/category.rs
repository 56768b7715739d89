//! Score categorization and follow-up recommendations.

use serde::{Deserialize, Serialize};

/// Lead temperature band. Ordered hottest first; `categorize` is total
/// over the whole score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    VeryVeryHot,
    VeryHot,
    Hot,
    Warm,
    Cool,
    ColdSpam,
}

impl ScoreCategory {
    /// Sales priority, 1 = drop everything.
    pub fn priority(&self) -> u8 {
        match self {
            ScoreCategory::VeryVeryHot => 1,
            ScoreCategory::VeryHot => 1,
            ScoreCategory::Hot => 2,
            ScoreCategory::Warm => 3,
            ScoreCategory::Cool => 4,
            ScoreCategory::ColdSpam => 5,
        }
    }

    /// Recommended next action for the sales owner.
    pub fn action(&self) -> &'static str {
        match self {
            ScoreCategory::VeryVeryHot => "Llamar INMEDIATAMENTE",
            ScoreCategory::VeryHot => "Agendar cita hoy",
            ScoreCategory::Hot => "Agendar cita esta semana",
            ScoreCategory::Warm => "Enviar información",
            ScoreCategory::Cool => "Seguimiento automático",
            ScoreCategory::ColdSpam => "Ignorar o archivar",
        }
    }

    /// Target window for first contact.
    pub fn contact_window(&self) -> &'static str {
        match self {
            ScoreCategory::VeryVeryHot => "0-30 minutos",
            ScoreCategory::VeryHot => "0-2 horas",
            ScoreCategory::Hot => "1-2 días",
            ScoreCategory::Warm => "3-5 días",
            ScoreCategory::Cool => "1-2 semanas",
            ScoreCategory::ColdSpam => "Nunca",
        }
    }

    /// Estimated probability the lead converts.
    pub fn conversion_probability(&self) -> f64 {
        match self {
            ScoreCategory::VeryVeryHot => 0.9,
            ScoreCategory::VeryHot => 0.75,
            ScoreCategory::Hot => 0.6,
            ScoreCategory::Warm => 0.4,
            ScoreCategory::Cool => 0.2,
            ScoreCategory::ColdSpam => 0.05,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreCategory::VeryVeryHot => "very_very_hot",
            ScoreCategory::VeryHot => "very_hot",
            ScoreCategory::Hot => "hot",
            ScoreCategory::Warm => "warm",
            ScoreCategory::Cool => "cool",
            ScoreCategory::ColdSpam => "cold_spam",
        }
    }
}

/// Map a score to its band by descending threshold.
pub fn categorize(score: u8) -> ScoreCategory {
    match score {
        90..=u8::MAX => ScoreCategory::VeryVeryHot,
        80..=89 => ScoreCategory::VeryHot,
        70..=79 => ScoreCategory::Hot,
        50..=69 => ScoreCategory::Warm,
        30..=49 => ScoreCategory::Cool,
        _ => ScoreCategory::ColdSpam,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_over_range() {
        for s in 0..=100u8 {
            let c = categorize(s);
            assert!((1..=5).contains(&c.priority()));
            assert!(!c.action().is_empty());
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(categorize(90), ScoreCategory::VeryVeryHot);
        assert_eq!(categorize(89), ScoreCategory::VeryHot);
        assert_eq!(categorize(80), ScoreCategory::VeryHot);
        assert_eq!(categorize(79), ScoreCategory::Hot);
        assert_eq!(categorize(70), ScoreCategory::Hot);
        assert_eq!(categorize(69), ScoreCategory::Warm);
        assert_eq!(categorize(50), ScoreCategory::Warm);
        assert_eq!(categorize(49), ScoreCategory::Cool);
        assert_eq!(categorize(30), ScoreCategory::Cool);
        assert_eq!(categorize(29), ScoreCategory::ColdSpam);
        assert_eq!(categorize(0), ScoreCategory::ColdSpam);
    }

    #[test]
    fn test_hot_profile() {
        let c = categorize(95);
        assert_eq!(c.priority(), 1);
        assert_eq!(c.action(), "Llamar INMEDIATAMENTE");
        assert_eq!(c.contact_window(), "0-30 minutos");
        assert!((c.conversion_probability() - 0.9).abs() < f64::EPSILON);
    }
}
