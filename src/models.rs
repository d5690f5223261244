use serde::Serialize;

/// A normalized patient record in the model's 11-column layout.
///
/// Field names follow the training dataset, including the original-cased
/// `Residence_type` column on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct PatientInput {
    pub id: String,
    pub gender: Gender,
    pub age: f64,
    pub hypertension: u8,
    pub heart_disease: u8,
    pub ever_married: EverMarried,
    pub work_type: WorkType,
    #[serde(rename = "Residence_type")]
    pub residence_type: ResidenceType,
    pub avg_glucose_level: f64,
    pub bmi: Option<f64>,
    pub smoking_status: SmokingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    #[serde(rename = "Male")]
    Male,
    #[serde(rename = "Female")]
    Female,
    #[serde(rename = "Other")]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EverMarried {
    #[serde(rename = "Yes")]
    Yes,
    #[serde(rename = "No")]
    No,
}

impl EverMarried {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkType {
    #[serde(rename = "children")]
    Children,
    #[serde(rename = "Govt_job")]
    GovtJob,
    #[serde(rename = "Never_worked")]
    NeverWorked,
    #[serde(rename = "Private")]
    Private,
    #[serde(rename = "Self-employed")]
    SelfEmployed,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Children => "children",
            Self::GovtJob => "Govt_job",
            Self::NeverWorked => "Never_worked",
            Self::Private => "Private",
            Self::SelfEmployed => "Self-employed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResidenceType {
    #[serde(rename = "Urban")]
    Urban,
    #[serde(rename = "Rural")]
    Rural,
}

impl ResidenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::Rural => "Rural",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SmokingStatus {
    #[serde(rename = "smokes")]
    Smokes,
    #[serde(rename = "formerly smoked")]
    FormerlySmoked,
    #[serde(rename = "never smoked")]
    NeverSmoked,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl SmokingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smokes => "smokes",
            Self::FormerlySmoked => "formerly smoked",
            Self::NeverSmoked => "never smoked",
            Self::Unknown => "Unknown",
        }
    }
}

/// Outcome of a prediction, local or remote.
///
/// `probability` is always set by the local scorer; endpoint responses may
/// omit it, in which case classification falls back to the label alone.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub label: u8,
    pub probability: Option<f64>,
}
