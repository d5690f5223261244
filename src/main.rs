use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod classify;
mod client;
mod input;
mod models;
mod report;
mod score;
mod session;
mod wire;

use client::{PredictClient, SubmitError};
use input::RawPatientForm;
use session::{PredictionSource, SubmitSession};

#[derive(Parser)]
#[command(name = "stroke-risk-intake")]
#[command(about = "Collect stroke risk factors and submit them for prediction", long_about = None)]
struct Cli {
    /// Prediction endpoint URL. Falls back to the PREDICT_ENDPOINT
    /// environment variable; with neither set, `predict` runs the local
    /// demo heuristic.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Raw patient field flags. Values are passed through the normalizer, so
/// anything parseable is accepted and anything else degrades to a default
/// instead of failing the command.
#[derive(Args, Clone, Default)]
struct PatientArgs {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    hypertension: Option<String>,
    #[arg(long)]
    heart_disease: Option<String>,
    #[arg(long)]
    ever_married: Option<String>,
    #[arg(long)]
    work_type: Option<String>,
    #[arg(long)]
    residence_type: Option<String>,
    #[arg(long)]
    avg_glucose_level: Option<String>,
    #[arg(long)]
    bmi: Option<String>,
    #[arg(long)]
    smoking_status: Option<String>,
}

impl From<PatientArgs> for RawPatientForm {
    fn from(args: PatientArgs) -> Self {
        Self {
            id: args.id,
            gender: args.gender,
            age: args.age,
            hypertension: args.hypertension,
            heart_disease: args.heart_disease,
            ever_married: args.ever_married,
            work_type: args.work_type,
            residence_type: args.residence_type,
            avg_glucose_level: args.avg_glucose_level,
            bmi: args.bmi,
            smoking_status: args.smoking_status,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a patient record for prediction
    Predict {
        #[command(flatten)]
        patient: PatientArgs,
        /// Read patient rows from a CSV file (field flags are ignored);
        /// rows are submitted one at a time
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Probe the endpoint's /health route
    Check,
    /// Print the wire body for a patient record without submitting
    Encode {
        #[command(flatten)]
        patient: PatientArgs,
        /// Emit the JSON body instead of the default CSV
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Resolved once here and handed to the client explicitly; nothing else
    // reads the environment.
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| std::env::var("PREDICT_ENDPOINT").ok())
        .filter(|url| !url.trim().is_empty());

    match cli.command {
        Commands::Predict { patient, csv } => {
            predict(endpoint.as_deref(), patient, csv.as_deref()).await?;
        }
        Commands::Check => {
            check(endpoint.as_deref()).await?;
        }
        Commands::Encode { patient, json } => {
            encode(patient, json)?;
        }
    }

    Ok(())
}

async fn predict(
    endpoint: Option<&str>,
    patient: PatientArgs,
    csv: Option<&Path>,
) -> anyhow::Result<()> {
    let client = match endpoint {
        Some(url) => Some(PredictClient::new(url)?),
        None => {
            tracing::info!("no prediction endpoint configured, using the local demo heuristic");
            None
        }
    };

    let forms = match csv {
        Some(path) => read_patient_csv(path)?,
        None => vec![patient.into()],
    };

    let mut session = SubmitSession::new();
    let total = forms.len();

    for (index, form) in forms.into_iter().enumerate() {
        let record = input::normalize(&form);
        if total > 1 {
            println!("[{}/{}] {}", index + 1, total, report::describe_input(&record));
        }

        session
            .begin()
            .context("submit control should be free between records")?;
        if client.is_some() {
            println!("{}", report::render(session.state()));
        }

        let outcome = match &client {
            Some(client) => client
                .submit(&record)
                .await
                .map(|result| (result, PredictionSource::Endpoint)),
            None => Ok((score::simulate(&record), PredictionSource::LocalHeuristic)),
        };

        // Both completion paths re-enable submission; a failed record never
        // stops the rest of a batch.
        match outcome {
            Ok((result, source)) => {
                let classification = classify::classify(&result);
                session.succeed(result, classification, source);
            }
            Err(err) => {
                tracing::warn!(error = %err, patient = %record.id, "submission failed");
                session.fail(err.to_string());
            }
        }

        print!("{}", report::render(session.state()));
        session.reset();
    }

    Ok(())
}

async fn check(endpoint: Option<&str>) -> anyhow::Result<()> {
    let endpoint = endpoint.ok_or(SubmitError::Unconfigured)?;
    let client = PredictClient::new(endpoint)?;
    match client.check_health().await {
        Ok(status) => println!("{}", report::render_health(&status)),
        Err(err) => println!("No server connection: {err}"),
    }
    Ok(())
}

fn encode(patient: PatientArgs, json: bool) -> anyhow::Result<()> {
    let record = input::normalize(&patient.into());
    if json {
        println!("{}", wire::to_json(&record)?);
    } else {
        print!("{}", wire::to_csv(&record)?);
    }
    Ok(())
}

fn read_patient_csv(path: &Path) -> anyhow::Result<Vec<RawPatientForm>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let headers = reader.headers()?.clone();

    let mut forms = Vec::new();
    for record in reader.records() {
        let record = record?;
        forms.push(RawPatientForm::from_csv_record(&headers, &record));
    }

    if forms.is_empty() {
        anyhow::bail!("no patient rows found in {}", path.display());
    }

    Ok(forms)
}
