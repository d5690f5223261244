use crate::models::{PatientInput, PredictionResult, SmokingStatus};

/// Demo-only heuristic used when no prediction endpoint is configured.
/// This is NOT a medical model.
///
/// Each term is clamped before summing and the total is clamped to [0, 1].
pub fn simulate(input: &PatientInput) -> PredictionResult {
    let mut score = 0.0;

    // age up to 25%
    score += (input.age / 100.0).min(1.0) * 0.25;

    // conditions
    if input.hypertension == 1 {
        score += 0.18;
    }
    if input.heart_disease == 1 {
        score += 0.16;
    }

    // glucose & bmi
    score += (input.avg_glucose_level / 300.0).min(1.0) * 0.18;
    if let Some(bmi) = input.bmi {
        score += ((bmi - 18.5) / 30.0).clamp(0.0, 1.0) * 0.12;
    }

    score += match input.smoking_status {
        SmokingStatus::Smokes => 0.06,
        SmokingStatus::FormerlySmoked => 0.03,
        SmokingStatus::NeverSmoked | SmokingStatus::Unknown => 0.0,
    };

    let score = score.clamp(0.0, 1.0);

    PredictionResult {
        label: if score >= 0.35 { 1 } else { 0 },
        probability: Some(round3(score)),
    }
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
