use axum::{
    body::Bytes,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use design_core::{design, CalcError, ElementKind, MaterialCatalog};
use serde_json::{json, Value};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

pub fn create_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/elements", get(list_elements))
        .route(
            "/api/v1/design/:element",
            post(design_element).options(preflight),
        )
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "armature-design",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_elements() -> Json<Value> {
    let elements: Vec<&str> = ElementKind::ALL.iter().map(|k| k.slug()).collect();
    Json(json!({
        "elements": elements,
        "materialTables": MaterialCatalog::standard().version()
    }))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn design_element(Path(element): Path<String>, body: Bytes) -> Response {
    let span = tracing::info_span!(
        "design",
        request_id = %Uuid::new_v4(),
        element = %element
    );
    let (status, payload) = span.in_scope(|| respond(&element, &body));
    (status, Json(payload)).into_response()
}

/// Map an element slug and raw request body to the HTTP status and JSON body.
pub fn respond(element: &str, body: &[u8]) -> (StatusCode, Value) {
    match run_design(element, body) {
        Ok(result) => {
            tracing::debug!("design completed");
            (StatusCode::OK, result)
        }
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!(code = err.code(), "{}", err.message());
            } else {
                tracing::info!(code = err.code(), "rejected request: {}", err.message());
            }
            (status, err.body())
        }
    }
}

fn run_design(element: &str, body: &[u8]) -> Result<Value, ApiError> {
    let kind = ElementKind::from_slug(element).map_err(ApiError::Design)?;
    let request: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidBody(format!("request body is not valid JSON: {}", e)))?;
    design(kind, &request, MaterialCatalog::standard()).map_err(ApiError::Design)
}

#[derive(Debug)]
pub enum ApiError {
    InvalidBody(String),
    Design(CalcError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Design(CalcError::UnknownElement { .. }) => StatusCode::NOT_FOUND,
            ApiError::Design(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Design(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidBody(_) => "INVALID_JSON",
            ApiError::Design(err) => err.error_code(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidBody(msg) => msg.clone(),
            ApiError::Design(err) => err.to_string(),
        }
    }

    fn body(&self) -> Value {
        json!({
            "error": self.message(),
            "code": self.code()
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_body() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "axialLoad": 1500, "momentX": 50, "momentY": 30,
            "columnWidth": 400, "columnDepth": 400, "columnHeight": 3.5,
            "concreteGrade": "C30", "steelGrade": "420"
        }))
        .unwrap()
    }

    #[test]
    fn test_column_request_succeeds() {
        let (status, body) = respond("column", &column_body());
        assert_eq!(status, StatusCode::OK);
        assert!(body["utilizationRatio"].as_f64().unwrap().is_finite());
        assert!(body["warnings"].is_array());
    }

    #[test]
    fn test_missing_axial_load_is_400() {
        let body = serde_json::to_vec(&json!({
            "columnWidth": 400, "columnDepth": 400, "columnHeight": 3.5
        }))
        .unwrap();
        let (status, body) = respond("column", &body);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("axialLoad"));
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn test_every_violation_is_listed() {
        let body = serde_json::to_vec(&json!({
            "axialLoad": -5, "columnWidth": 90, "columnDepth": 400, "columnHeight": 3.5
        }))
        .unwrap();
        let (status, body) = respond("column", &body);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("axialLoad"));
        assert!(error.contains("columnWidth"));
    }

    #[test]
    fn test_invalid_json_is_400() {
        let (status, body) = respond("beam", b"{not json");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
    }

    #[test]
    fn test_non_object_body_is_400() {
        let (status, _) = respond("slab", b"[1, 2, 3]");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_element_is_404() {
        let (status, body) = respond("bridge", b"{}");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("bridge"));
    }

    #[test]
    fn test_inadequate_design_is_still_200() {
        // Tiny column under a large load
        let body = serde_json::to_vec(&json!({
            "axialLoad": 9000, "columnWidth": 200, "columnDepth": 200, "columnHeight": 3.0
        }))
        .unwrap();
        let (status, body) = respond("column", &body);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isAdequate"], false);
    }

    #[test]
    fn test_retaining_wall_slug() {
        let body = serde_json::to_vec(&json!({
            "wallHeight": 4.0, "stemThicknessTop": 250, "stemThicknessBottom": 350,
            "baseWidth": 2500, "baseThickness": 400, "toeWidth": 1200,
            "soilUnitWeight": 18, "soilFrictionAngle": 30, "surchargeLoad": 0,
            "allowableBearingPressure": 150
        }))
        .unwrap();
        let (status, body) = respond("retaining-wall", &body);
        assert_eq!(status, StatusCode::OK);
        assert!(body["FOS_overturning"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        let err = ApiError::Design(CalcError::non_finite("Ka"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body()["code"], "NON_FINITE");
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_elements_lists_every_slug() {
        let Json(body) = list_elements().await;
        let slugs = body["elements"].as_array().unwrap();
        assert_eq!(slugs.len(), ElementKind::ALL.len());
        assert!(slugs.iter().any(|s| s == "retaining-wall"));
    }
}
