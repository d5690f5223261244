use uuid::Uuid;

use crate::models::{
    EverMarried, Gender, PatientInput, ResidenceType, SmokingStatus, WorkType,
};

/// Raw, string-keyed form values as they arrive from CLI flags or a CSV row.
///
/// Nothing here is validated; [`normalize`] turns any combination of these
/// into a usable `PatientInput`.
#[derive(Debug, Clone, Default)]
pub struct RawPatientForm {
    pub id: Option<String>,
    pub gender: Option<String>,
    pub age: Option<String>,
    pub hypertension: Option<String>,
    pub heart_disease: Option<String>,
    pub ever_married: Option<String>,
    pub work_type: Option<String>,
    pub residence_type: Option<String>,
    pub avg_glucose_level: Option<String>,
    pub bmi: Option<String>,
    pub smoking_status: Option<String>,
}

impl RawPatientForm {
    /// Build a form from one CSV record, keyed by header name.
    ///
    /// Header matching is case-insensitive so both `Residence_type` (the
    /// dataset spelling) and `residence_type` are accepted.
    pub fn from_csv_record(headers: &csv::StringRecord, record: &csv::StringRecord) -> Self {
        let field = |name: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .and_then(|idx| record.get(idx))
                .map(|v| v.to_string())
        };

        Self {
            id: field("id"),
            gender: field("gender"),
            age: field("age"),
            hypertension: field("hypertension"),
            heart_disease: field("heart_disease"),
            ever_married: field("ever_married"),
            work_type: field("work_type"),
            residence_type: field("Residence_type"),
            avg_glucose_level: field("avg_glucose_level"),
            bmi: field("bmi"),
            smoking_status: field("smoking_status"),
        }
    }
}

/// Coerce raw form values into a `PatientInput`.
///
/// Every path produces a record: malformed numerics zero out, unknown
/// categoricals degrade to a default variant, and only `bmi` keeps a real
/// "unknown" (null) state. Submission is never blocked on input shape.
pub fn normalize(raw: &RawPatientForm) -> PatientInput {
    PatientInput {
        id: normalize_id(raw.id.as_deref()),
        gender: parse_gender(text(&raw.gender)),
        age: parse_number(text(&raw.age)).max(0.0),
        hypertension: parse_flag(text(&raw.hypertension)),
        heart_disease: parse_flag(text(&raw.heart_disease)),
        ever_married: parse_ever_married(text(&raw.ever_married)),
        work_type: parse_work_type(text(&raw.work_type)),
        residence_type: parse_residence(text(&raw.residence_type)),
        avg_glucose_level: parse_number(text(&raw.avg_glucose_level)).max(0.0),
        bmi: parse_bmi(text(&raw.bmi)),
        smoking_status: parse_smoking(text(&raw.smoking_status)),
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn normalize_id(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("intake-{}", Uuid::new_v4()),
    }
}

/// Best-effort numeric parse: empty, unparseable, or non-finite input is 0.
fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// 0/1 condition flags. Anything that does not parse to exactly 1 is 0.
fn parse_flag(raw: &str) -> u8 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n == 1.0 => 1,
        _ => 0,
    }
}

/// BMI keeps a null state: empty or an "n/a" sentinel (any case, with or
/// without the slash) is unknown, as is anything that fails to parse.
/// Never defaults to 0; the fallback scorer must distinguish unknown from
/// zero.
pub fn parse_bmi(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_ascii_lowercase();
    if lowered == "na" || lowered == "n/a" {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Lowercase and strip separators so `Self-employed`, `self_employed`, and
/// `self employed` all land on the same key.
fn canonical(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '/'))
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_gender(raw: &str) -> Gender {
    match canonical(raw).as_str() {
        "male" | "m" => Gender::Male,
        "female" | "f" => Gender::Female,
        _ => Gender::Other,
    }
}

fn parse_ever_married(raw: &str) -> EverMarried {
    match canonical(raw).as_str() {
        "yes" | "y" | "true" | "1" => EverMarried::Yes,
        _ => EverMarried::No,
    }
}

fn parse_work_type(raw: &str) -> WorkType {
    match canonical(raw).as_str() {
        "children" => WorkType::Children,
        "govtjob" => WorkType::GovtJob,
        "neverworked" => WorkType::NeverWorked,
        "selfemployed" => WorkType::SelfEmployed,
        _ => WorkType::Private,
    }
}

fn parse_residence(raw: &str) -> ResidenceType {
    match canonical(raw).as_str() {
        "rural" => ResidenceType::Rural,
        _ => ResidenceType::Urban,
    }
}

fn parse_smoking(raw: &str) -> SmokingStatus {
    match canonical(raw).as_str() {
        "smokes" => SmokingStatus::Smokes,
        "formerlysmoked" => SmokingStatus::FormerlySmoked,
        "neversmoked" => SmokingStatus::NeverSmoked,
        _ => SmokingStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(field: &str, value: &str) -> RawPatientForm {
        let mut form = RawPatientForm::default();
        match field {
            "age" => form.age = Some(value.to_string()),
            "bmi" => form.bmi = Some(value.to_string()),
            "hypertension" => form.hypertension = Some(value.to_string()),
            other => panic!("unhandled field {other}"),
        }
        form
    }

    #[test]
    fn bmi_sentinels_are_null() {
        for value in ["", "  ", "N/A", "n/a", "na", "NA", "abc"] {
            assert_eq!(parse_bmi(value), None, "bmi {value:?} should be null");
        }
        assert_eq!(parse_bmi("24.5"), Some(24.5));
        assert_eq!(parse_bmi(" 36.6 "), Some(36.6));
    }

    #[test]
    fn bmi_never_defaults_to_zero() {
        let input = normalize(&raw("bmi", "not-a-number"));
        assert_eq!(input.bmi, None);
    }

    #[test]
    fn malformed_numbers_zero_out() {
        assert_eq!(normalize(&raw("age", "")).age, 0.0);
        assert_eq!(normalize(&raw("age", "sixty")).age, 0.0);
        assert_eq!(normalize(&raw("age", "inf")).age, 0.0);
        assert_eq!(normalize(&raw("age", "67")).age, 67.0);
    }

    #[test]
    fn negative_numbers_floor_at_zero() {
        assert_eq!(normalize(&raw("age", "-3")).age, 0.0);
    }

    #[test]
    fn condition_flags_require_exactly_one() {
        assert_eq!(normalize(&raw("hypertension", "1")).hypertension, 1);
        assert_eq!(normalize(&raw("hypertension", "1.0")).hypertension, 1);
        assert_eq!(normalize(&raw("hypertension", "0")).hypertension, 0);
        assert_eq!(normalize(&raw("hypertension", "2")).hypertension, 0);
        assert_eq!(normalize(&raw("hypertension", "yes")).hypertension, 0);
        assert_eq!(normalize(&raw("hypertension", "")).hypertension, 0);
    }

    #[test]
    fn unknown_categoricals_degrade_to_defaults() {
        let input = normalize(&RawPatientForm::default());
        assert_eq!(input.gender, Gender::Other);
        assert_eq!(input.ever_married, EverMarried::No);
        assert_eq!(input.work_type, WorkType::Private);
        assert_eq!(input.residence_type, ResidenceType::Urban);
        assert_eq!(input.smoking_status, SmokingStatus::Unknown);
    }

    #[test]
    fn categorical_spellings_are_forgiving() {
        let mut form = RawPatientForm::default();
        form.work_type = Some("self employed".to_string());
        form.smoking_status = Some("Formerly Smoked".to_string());
        form.gender = Some("FEMALE".to_string());
        let input = normalize(&form);
        assert_eq!(input.work_type, WorkType::SelfEmployed);
        assert_eq!(input.smoking_status, SmokingStatus::FormerlySmoked);
        assert_eq!(input.gender, Gender::Female);
    }

    #[test]
    fn missing_id_gets_an_intake_key() {
        let input = normalize(&RawPatientForm::default());
        assert!(input.id.starts_with("intake-"));

        let mut form = RawPatientForm::default();
        form.id = Some("P-0042".to_string());
        assert_eq!(normalize(&form).id, "P-0042");
    }

    #[test]
    fn csv_record_maps_by_header_name() {
        let headers = csv::StringRecord::from(vec![
            "id",
            "gender",
            "age",
            "hypertension",
            "heart_disease",
            "ever_married",
            "work_type",
            "Residence_type",
            "avg_glucose_level",
            "bmi",
            "smoking_status",
        ]);
        let record = csv::StringRecord::from(vec![
            "9046",
            "Male",
            "67",
            "0",
            "1",
            "Yes",
            "Private",
            "Urban",
            "228.69",
            "36.6",
            "formerly smoked",
        ]);

        let input = normalize(&RawPatientForm::from_csv_record(&headers, &record));
        assert_eq!(input.id, "9046");
        assert_eq!(input.age, 67.0);
        assert_eq!(input.heart_disease, 1);
        assert_eq!(input.residence_type, ResidenceType::Urban);
        assert_eq!(input.bmi, Some(36.6));
        assert_eq!(input.smoking_status, SmokingStatus::FormerlySmoked);
    }
}
