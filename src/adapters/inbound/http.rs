use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use geojson::FeatureCollection;
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::adapters::outbound::buildings_to_geojson;
use crate::application::{EvacuationService, PersonView, RemoveAllResponse};
use crate::common::{DomainError, GeoCoord};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Every failure reaches the client as the same 400; the detail is only logged.
#[derive(Debug)]
pub struct HttpApiError {
    detail: String,
}

impl From<DomainError> for HttpApiError {
    fn from(err: DomainError) -> Self {
        Self { detail: err.to_string() }
    }
}

impl IntoResponse for HttpApiError {
    fn into_response(self) -> Response {
        tracing::warn!("request failed: {}", self.detail);
        (StatusCode::BAD_REQUEST, Json(ErrorBody { error: "request failed" })).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertResponse {
    pub alert_mode: bool,
}

#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<EvacuationService>>,
}

impl AppState {
    pub fn new(service: EvacuationService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }
}

pub async fn serve(addr: &str, state: AppState) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/addPerson/{lat}/{lon}", get(add_person))
        .route("/addPeople/{n}", get(add_people))
        .route("/removeAllPeople", get(remove_all_people))
        .route("/moveStep", get(move_step))
        .route("/alert", get(toggle_alert))
        .route("/buildings", get(buildings))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn add_person(
    State(state): State<AppState>,
    Path((lat, lon)): Path<(f64, f64)>,
) -> Result<Json<PersonView>, HttpApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.add_person(GeoCoord::new(lat, lon))?))
}

async fn add_people(
    State(state): State<AppState>,
    Path(n): Path<usize>,
) -> Result<Json<Vec<PersonView>>, HttpApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.add_people_at_random_exit_doors(n)?))
}

async fn remove_all_people(State(state): State<AppState>) -> Json<RemoveAllResponse> {
    let mut service = state.service.lock().await;
    Json(service.remove_all_people())
}

async fn move_step(State(state): State<AppState>) -> Result<Json<Vec<PersonView>>, HttpApiError> {
    let mut service = state.service.lock().await;
    Ok(Json(service.step()?))
}

async fn toggle_alert(State(state): State<AppState>) -> Json<AlertResponse> {
    let mut service = state.service.lock().await;
    let alert = service.toggle_alert();
    Json(AlertResponse {
        alert_mode: alert.is_on(),
    })
}

async fn buildings(State(state): State<AppState>) -> Result<Json<FeatureCollection>, HttpApiError> {
    let service = state.service.lock().await;
    Ok(Json(buildings_to_geojson(service.buildings(), service.projection())?))
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::init_noop_logger;
    use crate::config::Config;
    use crate::domains::map::{MapWay, NodeLookup};

    fn state_with_one_building() -> AppState {
        let mut config = Config::default();
        config.simulation.seed = Some(7);
        let mut service = EvacuationService::from_config(&config, init_noop_logger()).unwrap();

        let nodes: NodeLookup = vec![
            (1, GeoCoord::new(-33.0440, -71.6230)),
            (2, GeoCoord::new(-33.0440, -71.6228)),
            (3, GeoCoord::new(-33.0442, -71.6228)),
            (4, GeoCoord::new(-33.0442, -71.6230)),
        ]
        .into_iter()
        .collect();
        let ways = vec![MapWay::new(10, vec![1, 2, 3, 4, 1]).with_tag("building", "yes")];
        service.load_footprints(&ways, &nodes);
        AppState::new(service)
    }

    #[tokio::test]
    async fn add_people_then_move_step_returns_everyone_in_id_order() {
        let state = state_with_one_building();

        let Json(added) = add_people(State(state.clone()), Path(1)).await.unwrap();
        assert_eq!(added.len(), 1);

        let Json(person) = add_person(State(state.clone()), Path((-33.0450, -71.6240)))
            .await
            .unwrap();
        assert_eq!(person.id.0, 1);

        let Json(moved) = move_step(State(state.clone())).await.unwrap();
        let ids: Vec<usize> = moved.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[tokio::test]
    async fn remove_all_people_reports_success_and_empties_the_next_step() {
        let state = state_with_one_building();
        add_people(State(state.clone()), Path(5)).await.unwrap();

        let Json(response) = remove_all_people(State(state.clone())).await;
        assert!(response.success);

        let Json(moved) = move_step(State(state)).await.unwrap();
        assert!(moved.is_empty());
    }

    #[tokio::test]
    async fn alert_endpoint_reports_the_new_state() {
        let state = state_with_one_building();
        let Json(first) = toggle_alert(State(state.clone())).await;
        let Json(second) = toggle_alert(State(state)).await;
        assert!(first.alert_mode);
        assert!(!second.alert_mode);
    }

    #[tokio::test]
    async fn out_of_zone_coordinate_is_a_generic_bad_request() {
        let state = state_with_one_building();
        let err = add_person(State(state), Path((48.85, 2.35))).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_spawn_request_is_a_bad_request_and_adds_nobody() {
        let state = state_with_one_building();
        let err = add_people(State(state.clone()), Path(10_000_000_000)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let Json(moved) = move_step(State(state)).await.unwrap();
        assert!(moved.is_empty());
    }

    #[test]
    fn io_errors_convert_into_server_errors() {
        let err: ServerError = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken").into();
        assert!(matches!(err, ServerError::Io(_)));
        assert_eq!(err.to_string(), "server io error: port taken");
    }

    #[tokio::test]
    async fn buildings_are_exported_with_their_exit_doors() {
        let state = state_with_one_building();
        let Json(collection) = buildings(State(state)).await.unwrap();
        assert_eq!(collection.features.len(), 2);
    }
}
