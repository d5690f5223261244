use crate::models::PatientInput;

/// Column order the prediction endpoint was trained against. The header is
/// part of the contract, including the original casing of `Residence_type`.
pub const COLUMNS: [&str; 11] = [
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
];

/// Encode one patient as the `text/csv` request body: header row plus a
/// single record, each terminated by a newline. Cells containing a comma,
/// quote, or newline are quoted with internal quotes doubled; a null `bmi`
/// serializes as an empty cell, never omitted.
pub fn to_csv(input: &PatientInput) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    writer.write_record(cells(input))?;
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// JSON body alternative with the same field names. The endpoint contract
/// only requires CSV; this is the opt-in encoding for `encode --json`.
pub fn to_json(input: &PatientInput) -> Result<String, serde_json::Error> {
    serde_json::to_string(input)
}

fn cells(input: &PatientInput) -> [String; 11] {
    [
        input.id.clone(),
        input.gender.as_str().to_string(),
        fmt_number(input.age),
        input.hypertension.to_string(),
        input.heart_disease.to_string(),
        input.ever_married.as_str().to_string(),
        input.work_type.as_str().to_string(),
        input.residence_type.as_str().to_string(),
        fmt_number(input.avg_glucose_level),
        input.bmi.map(fmt_number).unwrap_or_default(),
        input.smoking_status.as_str().to_string(),
    ]
}

/// Whole numbers print without a trailing `.0` so `age=67` encodes as `67`,
/// matching the dataset the model was trained on.
fn fmt_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EverMarried, Gender, ResidenceType, SmokingStatus, WorkType};

    fn sample_input() -> PatientInput {
        PatientInput {
            id: "9046".to_string(),
            gender: Gender::Male,
            age: 67.0,
            hypertension: 0,
            heart_disease: 1,
            ever_married: EverMarried::Yes,
            work_type: WorkType::Private,
            residence_type: ResidenceType::Urban,
            avg_glucose_level: 228.69,
            bmi: Some(36.6),
            smoking_status: SmokingStatus::FormerlySmoked,
        }
    }

    #[test]
    fn encodes_header_and_row_with_trailing_newlines() {
        let body = to_csv(&sample_input()).unwrap();
        let expected = "id,gender,age,hypertension,heart_disease,ever_married,work_type,\
                        Residence_type,avg_glucose_level,bmi,smoking_status\n\
                        9046,Male,67,0,1,Yes,Private,Urban,228.69,36.6,formerly smoked\n";
        assert_eq!(body, expected);
    }

    #[test]
    fn null_bmi_serializes_as_empty_cell() {
        let mut input = sample_input();
        input.bmi = None;
        let body = to_csv(&input).unwrap();
        let row = body.lines().nth(1).unwrap();
        assert_eq!(row, "9046,Male,67,0,1,Yes,Private,Urban,228.69,,formerly smoked");
        assert_eq!(row.split(',').count(), 11);
    }

    #[test]
    fn comma_in_id_does_not_misalign_columns() {
        let mut input = sample_input();
        input.id = "a,b".to_string();
        let body = to_csv(&input).unwrap();
        let row = body.lines().nth(1).unwrap();
        assert!(row.starts_with("\"a,b\","));

        // A reader honoring the quoting still sees 11 columns.
        let mut reader = csv::Reader::from_reader(body.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 11);
        assert_eq!(&record[0], "a,b");
    }

    #[test]
    fn internal_quotes_are_doubled() {
        let mut input = sample_input();
        input.id = "say \"hi\"".to_string();
        let body = to_csv(&input).unwrap();
        assert!(body.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn json_body_keeps_dataset_field_names() {
        let mut input = sample_input();
        input.bmi = None;
        let body = to_json(&input).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["Residence_type"], "Urban");
        assert_eq!(value["smoking_status"], "formerly smoked");
        assert!(value["bmi"].is_null());
        assert_eq!(value["age"], 67.0);
    }
}
