use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use enzian_core::components::patient::RequiredField;
use enzian_core::{
    Advisory, ClinicalAlerts, CompartmentKind, Consistency, EnzianError, FindingRecord, Grade,
    NarrativeSection, Report, ReportConfig, advisories, assemble_narrative, check_ready,
    code_tokens, generate_code, validate,
};
use enzian_report::{ReportDocument, render_markdown};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across REST handlers
#[derive(Clone)]
struct AppState {
    cfg: Arc<ReportConfig>,
}

#[derive(Serialize)]
struct HealthRes {
    ok: bool,
    message: String,
}

#[derive(Serialize)]
struct CodeRes {
    code: String,
    tokens: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConsistencyReq {
    kind: CompartmentKind,
    magnitude: f64,
    tier: u8,
}

#[derive(Serialize)]
struct MissingFieldsRes {
    error: String,
    missing: Vec<RequiredField>,
}

/// Entry point for the #Enzian REST server
///
/// # Environment Variables
/// - `ENZIAN_REST_ADDR`: listen address (default: "0.0.0.0:3000")
/// - `ENZIAN_REPORT_TITLE`, `ENZIAN_REPORT_SUBTITLE`, `ENZIAN_SIGNATURE_LABEL`: report header text
/// - `ENZIAN_INCLUDE_RECOMMENDATIONS`: include the recommendations block (default: true)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("enzian=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ReportConfig::from_env_values(
        std::env::var("ENZIAN_REPORT_TITLE").ok(),
        std::env::var("ENZIAN_REPORT_SUBTITLE").ok(),
        std::env::var("ENZIAN_SIGNATURE_LABEL").ok(),
        std::env::var("ENZIAN_INCLUDE_RECOMMENDATIONS").ok(),
    )?;
    let rest_addr = std::env::var("ENZIAN_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting Enzian REST on {}", rest_addr);

    let app = router(AppState { cfg: Arc::new(cfg) });
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/code", post(code))
        .route("/advisories", post(list_advisories))
        .route("/alerts", post(alerts))
        .route("/narrative", post(narrative))
        .route("/report", post(report))
        .route("/report/markdown", post(report_markdown))
        .route("/consistency", post(consistency))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Enzian is alive".into(),
    })
}

/// Generate the #Enzian code for a finding record
async fn code(Json(record): Json<FindingRecord>) -> Json<CodeRes> {
    Json(CodeRes {
        code: generate_code(&record),
        tokens: code_tokens(&record),
    })
}

async fn list_advisories(Json(record): Json<FindingRecord>) -> Json<Vec<Advisory>> {
    Json(advisories(&record))
}

async fn alerts(Json(record): Json<FindingRecord>) -> Json<ClinicalAlerts> {
    Json(ClinicalAlerts::derive(&record))
}

async fn narrative(Json(record): Json<FindingRecord>) -> Json<Vec<NarrativeSection>> {
    Json(assemble_narrative(&record))
}

/// Compose the structured report
///
/// Returns 422 with the missing patient fields when the record is not ready.
async fn report(
    State(state): State<AppState>,
    Json(record): Json<FindingRecord>,
) -> Result<Json<Report>, Response> {
    check_ready(&record).map_err(error_response)?;
    Ok(Json(Report::compose(&record, &state.cfg)))
}

/// Render the report as Markdown with YAML front matter
async fn report_markdown(
    State(state): State<AppState>,
    Json(record): Json<FindingRecord>,
) -> Result<Response, Response> {
    check_ready(&record).map_err(error_response)?;
    let document = ReportDocument::new(Report::compose(&record, &state.cfg));
    let markdown = render_markdown(&document).map_err(|e| {
        tracing::error!("Render report error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
    })?;

    let disposition = format!("inline; filename=\"{}\"", document.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        markdown,
    )
        .into_response())
}

/// Check a selected compartment grade against a measured size
async fn consistency(
    Json(req): Json<ConsistencyReq>,
) -> Result<Json<Consistency>, (StatusCode, &'static str)> {
    let selected = match req.tier {
        1 => Grade::One,
        2 => Grade::Two,
        3 => Grade::Three,
        _ => return Err((StatusCode::BAD_REQUEST, "tier must be 1, 2 or 3")),
    };
    Ok(Json(validate(req.kind, req.magnitude, selected)))
}

fn error_response(err: EnzianError) -> Response {
    match err {
        EnzianError::MissingRequiredFields(missing) => {
            let error = EnzianError::MissingRequiredFields(missing.clone()).to_string();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(MissingFieldsRes { error, missing }),
            )
                .into_response()
        }
        other => {
            tracing::error!("Report error: {:?}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState {
            cfg: Arc::new(ReportConfig::default()),
        })
    }

    fn sample_record() -> Value {
        json!({
            "patient": {
                "name": "Ana Mora",
                "id": "1-2345-6789",
                "study_date": "2026-03-14"
            },
            "ovaries": {
                "right": {
                    "status": "abnormal",
                    "findings": { "max_diameter_cm": 8.5, "tier": "O3" }
                }
            },
            "compartment_a": {
                "status": "abnormal",
                "findings": { "diameter_cm": 2.5, "tier": "A3" }
            }
        })
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        let response = app().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let request = Request::get("/health").body(Body::empty()).expect("request");
        let response = app().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn code_endpoint_returns_code_and_tokens() {
        let (status, body) = post_json("/code", sample_record()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["code"], "#Enzian(u) O0/3, A3");
        assert_eq!(body["tokens"], json!(["O0/3", "A3"]));
    }

    #[tokio::test]
    async fn alerts_endpoint_lists_alerts() {
        let (status, body) = post_json("/alerts", sample_record()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn report_without_patient_is_unprocessable() {
        let (status, body) = post_json("/report", json!({})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["missing"], json!(["name", "id", "study_date"]));
    }

    #[tokio::test]
    async fn markdown_report_has_front_matter() {
        let (status, body) = post_json("/report/markdown", sample_record()).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).expect("utf8");
        assert!(text.starts_with("---\n"), "{text}");
        assert!(text.contains("#Enzian(u) O0/3, A3"));
    }

    #[tokio::test]
    async fn consistency_endpoint_reports_mismatch() {
        let (status, body) =
            post_json("/consistency", json!({"kind": "C", "magnitude": 3.5, "tier": 2})).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(body["result"], "mismatch");
        assert_eq!(body["expected"], "three");

        let (status, _) =
            post_json("/consistency", json!({"kind": "A", "magnitude": 1.0, "tier": 4})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_record_keys_are_rejected() {
        let (status, _) = post_json("/code", json!({"pancreas": {}})).await;
        assert!(status.is_client_error());
    }
}
