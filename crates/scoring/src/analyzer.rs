//! Batch lead-quality analysis.

use serde::{Deserialize, Serialize};

use crate::category::categorize;
use crate::scorer::{score, ScoringInput};

/// Score distribution by band, keyed on the categorizer thresholds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreHistogram {
    pub very_very_hot: usize,
    pub very_hot: usize,
    pub hot: usize,
    pub warm: usize,
    pub cool: usize,
    pub cold_spam: usize,
}

/// Aggregate quality report over a batch of lead scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadQualityReport {
    pub count: usize,
    /// Mean score, one decimal.
    pub mean: f64,
    pub min: u8,
    pub max: u8,
    pub histogram: ScoreHistogram,
    /// Mean per-lead conversion probability, two decimals.
    pub estimated_conversion_rate: f64,
}

/// Score a batch of raw inputs and summarize them. Convenience over
/// [`analyze`] for callers that have not scored yet.
pub fn analyze_inputs(inputs: &[ScoringInput]) -> LeadQualityReport {
    let scores: Vec<u8> = inputs.iter().map(score).collect();
    analyze(&scores)
}

/// Summarize a batch of scores. An empty batch yields a zero-filled
/// report rather than an error.
pub fn analyze(scores: &[u8]) -> LeadQualityReport {
    if scores.is_empty() {
        return LeadQualityReport::default();
    }

    let mut histogram = ScoreHistogram::default();
    let mut sum: u64 = 0;
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut probability_sum = 0.0;

    for &score in scores {
        sum += u64::from(score);
        min = min.min(score);
        max = max.max(score);
        let category = categorize(score);
        probability_sum += category.conversion_probability();
        match score {
            90..=u8::MAX => histogram.very_very_hot += 1,
            80..=89 => histogram.very_hot += 1,
            70..=79 => histogram.hot += 1,
            50..=69 => histogram.warm += 1,
            30..=49 => histogram.cool += 1,
            _ => histogram.cold_spam += 1,
        }
    }

    let count = scores.len();
    let mean = (sum as f64 / count as f64 * 10.0).round() / 10.0;
    let estimated_conversion_rate = (probability_sum / count as f64 * 100.0).round() / 100.0;

    LeadQualityReport {
        count,
        mean,
        min,
        max,
        histogram,
        estimated_conversion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch() {
        let report = analyze(&[]);
        assert_eq!(report, LeadQualityReport::default());
        assert_eq!(report.count, 0);
        assert_eq!(report.mean, 0.0);
    }

    #[test]
    fn test_single_hot_lead() {
        let report = analyze(&[95]);
        assert_eq!(report.count, 1);
        assert_eq!(report.mean, 95.0);
        assert_eq!(report.min, 95);
        assert_eq!(report.max, 95);
        assert_eq!(report.histogram.very_very_hot, 1);
        assert_eq!(report.estimated_conversion_rate, 0.9);
    }

    #[test]
    fn test_analyze_inputs_composes_scorer() {
        let inputs = vec![
            ScoringInput::new("spam"),
            ScoringInput::new("Necesito un presupuesto urgente").with_signals(true, true),
        ];
        let report = analyze_inputs(&inputs);
        assert_eq!(report.count, 2);
        assert_eq!(report.min, score(&inputs[0]));
        assert_eq!(report.max, score(&inputs[1]));
    }

    #[test]
    fn test_mixed_batch() {
        let report = analyze(&[95, 85, 72, 55, 40, 10]);
        assert_eq!(report.count, 6);
        assert_eq!(report.min, 10);
        assert_eq!(report.max, 95);
        // (95+85+72+55+40+10)/6 = 59.5
        assert_eq!(report.mean, 59.5);
        assert_eq!(report.histogram.very_very_hot, 1);
        assert_eq!(report.histogram.very_hot, 1);
        assert_eq!(report.histogram.hot, 1);
        assert_eq!(report.histogram.warm, 1);
        assert_eq!(report.histogram.cool, 1);
        assert_eq!(report.histogram.cold_spam, 1);
        // (0.9+0.75+0.6+0.4+0.2+0.05)/6 = 0.4833... -> 0.48
        assert_eq!(report.estimated_conversion_rate, 0.48);
    }
}
