use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;

use crate::models::{PatientInput, PredictionResult};
use crate::wire;

/// Candidate response keys, checked in order; the first non-null value wins.
const LABEL_KEYS: [&str; 3] = ["label", "prediction", "pred"];
const PROBABILITY_KEYS: [&str; 2] = ["probability", "prob"];

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no prediction endpoint configured; pass --endpoint or set PREDICT_ENDPOINT")]
    Unconfigured,

    #[error("invalid prediction endpoint {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to encode the request body: {0}")]
    Encode(#[from] csv::Error),

    #[error("prediction endpoint responded with HTTP {status}")]
    Server { status: u16 },

    #[error("unexpected response from prediction endpoint: {raw_body}")]
    UnexpectedShape { raw_body: String },

    #[error(
        "network error contacting the prediction endpoint, but the health check at \
         {health_url} responded: {health_body}; the predict path or proxy configuration \
         is likely wrong, check the server logs"
    )]
    ServerHealthy {
        health_url: String,
        health_body: String,
    },

    #[error(
        "network error contacting the prediction endpoint and the health check at \
         {health_url} returned HTTP {status}; confirm the server is running and healthy"
    )]
    ServerUnhealthy { health_url: String, status: u16 },

    #[error("failed to reach {endpoint}; the prediction server is most likely not running")]
    ServerUnreachable { endpoint: String },
}

/// Outcome of a `/health` probe that got a 2xx answer. `ok` is `None` when
/// the body was not the expected `{"ok": bool}` shape; the server still
/// counts as reachable.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub ok: Option<bool>,
    pub body: String,
}

/// HTTP client for the external prediction service.
///
/// The endpoint URL is supplied explicitly at construction; there is no
/// ambient configuration. One submit issues at most two requests: the
/// prediction POST and, only after a transport-level failure, a single
/// health probe to sharpen the error message. The prediction call itself is
/// never retried.
pub struct PredictClient {
    http: Client,
    endpoint: Url,
}

impl PredictClient {
    pub fn new(endpoint: &str) -> Result<Self, SubmitError> {
        let endpoint = Url::parse(endpoint).map_err(|source| SubmitError::InvalidEndpoint {
            url: endpoint.to_string(),
            source,
        })?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    /// POST the patient record as `text/csv` and parse the JSON prediction.
    pub async fn submit(&self, input: &PatientInput) -> Result<PredictionResult, SubmitError> {
        let body = wire::to_csv(input)?;
        tracing::debug!(endpoint = %self.endpoint, patient = %input.id, "posting patient record");

        let response = match self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/csv")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            // send() failing means no HTTP response arrived at all.
            Err(err) => return Err(self.diagnose_transport_failure(&err).await),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Server {
                status: status.as_u16(),
            });
        }

        let raw_body = response
            .text()
            .await
            .map_err(|err| SubmitError::UnexpectedShape {
                raw_body: format!("unreadable response body: {err}"),
            })?;
        parse_prediction(&raw_body)
    }

    /// GET `<origin>/health` and report whether the server answers.
    pub async fn check_health(&self) -> Result<HealthStatus, SubmitError> {
        let health_url = self.health_url();
        match self.http.get(health_url.clone()).send().await {
            Ok(probe) if probe.status().is_success() => {
                let body = probe.text().await.unwrap_or_default();
                Ok(HealthStatus {
                    ok: health_ok(&body),
                    body,
                })
            }
            Ok(probe) => Err(SubmitError::ServerUnhealthy {
                health_url: health_url.to_string(),
                status: probe.status().as_u16(),
            }),
            Err(err) => {
                tracing::debug!(error = %err, "health probe failed");
                Err(SubmitError::ServerUnreachable {
                    endpoint: self.endpoint.to_string(),
                })
            }
        }
    }

    /// The prediction request never reached a server. Probe `/health` once
    /// so the caller can tell a misrouted request from a dead server. This
    /// improves the message only; the original request is not retried.
    async fn diagnose_transport_failure(&self, err: &reqwest::Error) -> SubmitError {
        let health_url = self.health_url();
        tracing::warn!(
            error = %err,
            health_url = %health_url,
            "transport failure on predict request, probing health endpoint"
        );
        match self.check_health().await {
            Ok(status) => SubmitError::ServerHealthy {
                health_url: health_url.to_string(),
                health_body: status.body,
            },
            Err(SubmitError::ServerUnhealthy { health_url, status }) => {
                SubmitError::ServerUnhealthy { health_url, status }
            }
            Err(_) => SubmitError::ServerUnreachable {
                endpoint: self.endpoint.to_string(),
            },
        }
    }

    fn health_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.set_path("/health");
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

/// Parse a 2xx response body. Anything that is not JSON with a usable label
/// under one of the candidate keys surfaces the raw body for diagnosis.
fn parse_prediction(raw_body: &str) -> Result<PredictionResult, SubmitError> {
    let json: Value =
        serde_json::from_str(raw_body).map_err(|_| SubmitError::UnexpectedShape {
            raw_body: raw_body.to_string(),
        })?;

    let label = first_present(&json, &LABEL_KEYS).and_then(as_label);
    let Some(label) = label else {
        return Err(SubmitError::UnexpectedShape {
            raw_body: raw_body.to_string(),
        });
    };

    let probability = first_present(&json, &PROBABILITY_KEYS).and_then(Value::as_f64);

    Ok(PredictionResult { label, probability })
}

fn first_present<'a>(json: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| json.get(key))
        .find(|value| !value.is_null())
}

fn as_label(value: &Value) -> Option<u8> {
    if let Some(flag) = value.as_bool() {
        return Some(u8::from(flag));
    }
    if let Some(n) = value.as_f64() {
        return Some(u8::from(n != 0.0));
    }
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .map(|n| u8::from(n != 0.0))
}

fn health_ok(body: &str) -> Option<bool> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("ok").and_then(Value::as_bool))
}
