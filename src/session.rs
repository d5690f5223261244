use crate::classify::Classification;
use crate::models::PredictionResult;

/// Where a submission came from; the presenter words the result note
/// differently for the local heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionSource {
    Endpoint,
    LocalHeuristic,
}

/// One submit cycle. The machine only ever moves
/// `Idle -> Submitting -> Succeeded | Failed -> Idle`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded {
        result: PredictionResult,
        classification: Classification,
        source: PredictionSource,
    },
    Failed {
        message: String,
    },
}

/// Returned when a submit is attempted while another is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionInFlight;

impl std::fmt::Display for SubmissionInFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "a submission is already in flight")
    }
}

impl std::error::Error for SubmissionInFlight {}

/// Drives the single-in-flight submission rule.
///
/// The submit control is "disabled" exactly while the state is
/// `Submitting`: `begin` refuses re-entry, and both completion paths leave
/// the machine accepting again. There is no cancellation; abandoning a
/// session is just never completing it.
#[derive(Debug, Default)]
pub struct SubmitSession {
    state: SubmitState,
}

impl Default for SubmitState {
    fn default() -> Self {
        Self::Idle
    }
}

impl SubmitSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Whether a new submission may start right now.
    pub fn accepting(&self) -> bool {
        !matches!(self.state, SubmitState::Submitting)
    }

    /// Start a submission. Terminal states are implicitly acknowledged so a
    /// user can submit again straight from a rendered result.
    pub fn begin(&mut self) -> Result<(), SubmissionInFlight> {
        if !self.accepting() {
            return Err(SubmissionInFlight);
        }
        self.state = SubmitState::Submitting;
        Ok(())
    }

    pub fn succeed(
        &mut self,
        result: PredictionResult,
        classification: Classification,
        source: PredictionSource,
    ) {
        self.state = SubmitState::Succeeded {
            result,
            classification,
            source,
        };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = SubmitState::Failed {
            message: message.into(),
        };
    }

    /// Acknowledge a terminal state and return to `Idle`.
    pub fn reset(&mut self) {
        self.state = SubmitState::Idle;
    }
}
