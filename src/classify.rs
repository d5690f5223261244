use crate::models::PredictionResult;

/// Three-tier risk banding derived from the predicted probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Uncertain,
    High,
}

impl RiskBand {
    /// Display color used by the presenter, matching the page's banner
    /// classes.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Uncertain => "orange",
            Self::High => "red",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Uncertain => write!(f, "uncertain"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Display semantics for one prediction: the band plus the badge and banner
/// copy shown to the user. Computed fresh per response, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub band: RiskBand,
    pub badge_text: String,
    pub banner_message: &'static str,
}

/// Map a prediction onto its risk band.
///
/// With a probability present the 40/60 percent thresholds decide the band
/// (both are contract values: exactly 40 is uncertain, exactly 60 is high).
/// Without one, the label alone decides.
pub fn classify(result: &PredictionResult) -> Classification {
    let label_text = if result.label == 1 {
        "Stroke (1)"
    } else {
        "No stroke (0)"
    };

    match result.probability {
        Some(probability) => {
            let percent = probability * 100.0;
            if percent < 40.0 {
                Classification {
                    band: RiskBand::Low,
                    badge_text: "No stroke (0)".to_string(),
                    banner_message: "No stroke predicted — low risk",
                }
            } else if percent < 60.0 {
                Classification {
                    band: RiskBand::Uncertain,
                    badge_text: format!("Probably: {label_text}"),
                    banner_message: "Probability in middle range — result is uncertain",
                }
            } else {
                Classification {
                    band: RiskBand::High,
                    badge_text: "Stroke (1)".to_string(),
                    banner_message: "Stroke predicted — seek urgent medical evaluation",
                }
            }
        }
        None => Classification {
            band: if result.label == 1 {
                RiskBand::High
            } else {
                RiskBand::Low
            },
            badge_text: label_text.to_string(),
            banner_message: if result.label == 1 {
                "Stroke predicted — seek urgent medical evaluation"
            } else {
                "No stroke predicted — lower risk"
            },
        },
    }
}
