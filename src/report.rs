use std::fmt::Write;

use crate::client::HealthStatus;
use crate::models::PatientInput;
use crate::session::{PredictionSource, SubmitState};

/// Render the current submit state for the terminal. Pure function of the
/// state; printing is the caller's business.
pub fn render(state: &SubmitState) -> String {
    match state {
        SubmitState::Idle => String::new(),
        SubmitState::Submitting => "Sending to the prediction endpoint...".to_string(),
        SubmitState::Succeeded {
            result,
            classification,
            source,
        } => {
            let mut output = String::new();
            let _ = writeln!(
                output,
                "Prediction: {} [{} / {}]",
                classification.badge_text,
                classification.band,
                classification.band.color()
            );
            let _ = writeln!(
                output,
                "Estimated probability: {}",
                probability_text(result.probability)
            );
            let _ = writeln!(output, "{}", classification.banner_message);
            match source {
                PredictionSource::Endpoint => {
                    let _ = writeln!(output, "Result returned from the prediction endpoint.");
                }
                PredictionSource::LocalHeuristic => {
                    let _ = writeln!(
                        output,
                        "No endpoint configured; this is the local demo heuristic, \
                         not a medical model."
                    );
                }
            }
            let _ = writeln!(
                output,
                "Not a substitute for professional medical evaluation."
            );
            output
        }
        SubmitState::Failed { message } => format!("Request failed: {message}\n"),
    }
}

/// One-line summary of the record being submitted, for batch output.
pub fn describe_input(input: &PatientInput) -> String {
    format!(
        "{} ({}, age {}, glucose {}, bmi {})",
        input.id,
        input.gender.as_str(),
        input.age,
        input.avg_glucose_level,
        input
            .bmi
            .map(|b| b.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    )
}

pub fn render_health(status: &HealthStatus) -> String {
    match status.ok {
        Some(true) => format!("Server ready: {}", status.body),
        Some(false) => format!("Server reachable but not ready: {}", status.body),
        None => format!("Server reachable, status unknown: {}", status.body),
    }
}

fn probability_text(probability: Option<f64>) -> String {
    match probability {
        Some(p) => format!("{}%", (p * 100.0).round()),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::models::PredictionResult;

    fn succeeded(probability: Option<f64>, label: u8, source: PredictionSource) -> SubmitState {
        let result = PredictionResult { label, probability };
        let classification = classify(&result);
        SubmitState::Succeeded {
            result,
            classification,
            source,
        }
    }

    #[test]
    fn idle_renders_nothing() {
        assert_eq!(render(&SubmitState::Idle), "");
    }

    #[test]
    fn submitting_renders_the_loading_line() {
        assert!(render(&SubmitState::Submitting).contains("Sending"));
    }

    #[test]
    fn endpoint_result_renders_badge_probability_and_banner() {
        let output = render(&succeeded(Some(0.82), 1, PredictionSource::Endpoint));
        assert!(output.contains("Stroke (1)"));
        assert!(output.contains("high / red"));
        assert!(output.contains("82%"));
        assert!(output.contains("seek urgent medical evaluation"));
        assert!(output.contains("prediction endpoint"));
    }

    #[test]
    fn local_result_is_marked_as_the_demo_heuristic() {
        let output = render(&succeeded(Some(0.12), 0, PredictionSource::LocalHeuristic));
        assert!(output.contains("No stroke (0)"));
        assert!(output.contains("demo heuristic"));
    }

    #[test]
    fn missing_probability_renders_na() {
        let output = render(&succeeded(None, 1, PredictionSource::Endpoint));
        assert!(output.contains("Estimated probability: N/A"));
    }

    #[test]
    fn failure_renders_the_message() {
        let state = SubmitState::Failed {
            message: "prediction endpoint responded with HTTP 503".to_string(),
        };
        assert_eq!(
            render(&state),
            "Request failed: prediction endpoint responded with HTTP 503\n"
        );
    }

    #[test]
    fn health_rendering_follows_the_ok_flag() {
        let ready = HealthStatus {
            ok: Some(true),
            body: r#"{"ok":true}"#.to_string(),
        };
        assert!(render_health(&ready).starts_with("Server ready"));

        let unknown = HealthStatus {
            ok: None,
            body: "{}".to_string(),
        };
        assert!(render_health(&unknown).contains("status unknown"));
    }
}
