// src/http/mod.rs

use crate::grid::parse_csv;
use crate::model::transform::{delivery_from_record, purchase_order_from_record, shipment_from_record};
use crate::model::Shipment;
use crate::notify::{self, NotificationRequest};
use crate::poll::Poller;
use crate::sheets::{Dataset, SheetError, SheetReader};
use crate::shipments::{NewShipment, Tracker};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Everything handlers need, passed in explicitly. The repository lives
/// here, not in module state.
pub struct AppState {
    pub reader: SheetReader,
    pub tracker: Tracker,
    pub mailer: notify::MockMailer,
    pub http: reqwest::Client,
    /// Server-side counterpart of the dashboard's 30-second shipments poll;
    /// `None` when polling is disabled.
    pub shipments_poller: Option<Poller<Shipment>>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/data", get(get_data))
        .route("/dataset", get(get_dataset))
        .route("/dashboard", get(get_dashboard))
        .route("/shipments", get(get_shipments))
        .route("/shipment", post(post_shipment))
        .route("/shipment/:id", get(get_shipment).patch(patch_shipment))
        .route("/notification", post(post_notification))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn error_response(status: StatusCode, message: &str, details: Option<String>) -> Response {
    let body = match details {
        Some(details) => json!({ "error": message, "details": details }),
        None => json!({ "error": message }),
    };
    (status, Json(body)).into_response()
}

fn sheet_error_response(err: SheetError) -> Response {
    match &err {
        SheetError::Unconfigured(_) => {
            error!(%err, "configuration error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string(), None)
        }
        SheetError::RemoteFetch(details) => {
            error!(%err, "remote fetch failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch data from Google Sheets",
                Some(details.clone()),
            )
        }
        SheetError::Validation(_) => error_response(StatusCode::BAD_REQUEST, &err.to_string(), None),
        SheetError::NotFound(_) => {
            error_response(StatusCode::NOT_FOUND, "Shipment not found", None)
        }
    }
}

async fn get_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(url) = params.get("url").filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "CSV URL is required", None);
    };

    let text = match fetch_text(&state.http, url).await {
        Ok(text) => text,
        Err(details) => {
            error!(%url, %details, "CSV fetch failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch CSV data",
                Some(details),
            );
        }
    };
    Json(json!({ "success": true, "data": parse_csv(&text) })).into_response()
}

async fn fetch_text(http: &reqwest::Client, url: &str) -> Result<String, String> {
    let resp = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| e.to_string())?;
    resp.text().await.map_err(|e| e.to_string())
}

#[derive(Deserialize)]
struct DatasetQuery {
    #[serde(rename = "type")]
    dataset: Option<String>,
}

async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DatasetQuery>,
) -> Response {
    let key = query.dataset.as_deref().unwrap_or("shipments");
    let Some(dataset) = Dataset::from_key(key) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid data type", None);
    };

    let records = match state.reader.fetch_records(dataset).await {
        Ok(records) => records,
        Err(err) => return sheet_error_response(err),
    };

    let data = match dataset {
        Dataset::Shipments => {
            serde_json::to_value(records.iter().map(shipment_from_record).collect::<Vec<_>>())
        }
        Dataset::PurchaseOrders => serde_json::to_value(
            records.iter().map(purchase_order_from_record).collect::<Vec<_>>(),
        ),
        Dataset::Deliveries => {
            serde_json::to_value(records.iter().map(delivery_from_record).collect::<Vec<_>>())
        }
        // no dedicated shape; raw mapped records pass through
        Dataset::Inventory => serde_json::to_value(records),
        // not reachable through the public keys
        Dataset::ShipmentHistory => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid data type", None)
        }
    };
    match data {
        Ok(data) => Json(json!({ "success": true, "data": data })).into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to serialize dataset",
            Some(e.to_string()),
        ),
    }
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> Response {
    let Some(poller) = &state.shipments_poller else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Shipments polling is disabled",
            None,
        );
    };
    let snapshot = poller.snapshot().await;
    Json(json!({
        "success": snapshot.error.is_none(),
        "stale": snapshot.error.is_some() && snapshot.data.is_some(),
        "loading": snapshot.loading,
        "data": snapshot.data,
        "error": snapshot.error,
    }))
    .into_response()
}

async fn get_shipments(State(state): State<Arc<AppState>>) -> Response {
    match state.tracker.list_shipments().await {
        Ok(shipments) => Json(json!({ "success": true, "data": shipments })).into_response(),
        Err(err) => sheet_error_response(err),
    }
}

async fn get_shipment(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.tracker.shipment_by_id(&id).await {
        Ok(shipment) => Json(shipment).into_response(),
        Err(err) => sheet_error_response(err),
    }
}

#[derive(Deserialize)]
struct StatusUpdate {
    status: Option<String>,
    notes: Option<String>,
}

async fn patch_shipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Response {
    let Some(status) = update.status.filter(|s| !s.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Status is required", None);
    };
    let notes = update.notes.unwrap_or_default();
    match state.tracker.update_status(&id, &status, &notes).await {
        Ok(message) => Json(json!({ "success": true, "message": message })).into_response(),
        Err(err) => sheet_error_response(err),
    }
}

async fn post_shipment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewShipment>,
) -> Response {
    match state.tracker.create_shipment(&request).await {
        Ok(shipment) => Json(json!({
            "success": true,
            "message": "Shipment created successfully",
            "shipment": shipment,
        }))
        .into_response(),
        Err(err) => sheet_error_response(err),
    }
}

async fn post_notification(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NotificationRequest>,
) -> Response {
    let (Some(shipment_id), Some(client_email), Some(kind)) = (
        request.shipment_id.as_deref().filter(|v| !v.is_empty()),
        request.client_email.as_deref().filter(|v| !v.is_empty()),
        request.notification_type.as_deref().filter(|v| !v.is_empty()),
    ) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required fields: shipmentId, clientEmail, or notificationType",
            None,
        );
    };

    // additionalData entries win over the top-level fields on conflict
    let mut data = request.additional_data.clone();
    data.entry("shipmentId".to_string())
        .or_insert_with(|| shipment_id.to_string());
    data.entry("clientName".to_string()).or_insert_with(|| {
        request
            .client_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Client".to_string())
    });

    let template = notify::template_for(kind, &data);
    state.mailer.send(client_email, &template);

    Json(json!({
        "success": true,
        "message": format!("Notification of type {kind} sent to {client_email} for shipment {shipment_id}"),
        "emailSubject": template.subject,
        "emailPreview": notify::preview(&template),
    }))
    .into_response()
}
