//! Stub drone-delivery service with hard-coded responses.
//!
//! Request bodies are validated with `iyo_core`'s schema builder; a rejected
//! body becomes a 400 whose JSON names the error kind and the failing field.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use iyo_core::{Field, FieldType, Model, Schema, SchemaRegistry, TypedValueBuilder, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{info, warn};

const STRING: &[FieldType] = &[FieldType::String];

pub static DELIVERY: Schema = Schema::new(
    "Delivery",
    &[
        Field::required("id", &[FieldType::String, FieldType::Integer]),
        Field::required("at", STRING),
        Field::required("toAddressId", STRING),
        Field::required("orderItemId", STRING),
        Field::required("status", STRING),
        Field::optional("droneId", STRING),
    ],
);

pub static NEW_DELIVERY: Schema = Schema::new(
    "NewDelivery",
    &[
        Field::required("at", STRING),
        Field::required("toAddressId", STRING),
        Field::required("orderItemId", STRING),
    ],
);

pub static DELIVERY_UPDATE: Schema = Schema::new(
    "DeliveryUpdate",
    &[
        Field::optional("at", STRING),
        Field::optional("toAddressId", STRING),
        Field::optional("status", STRING),
        Field::optional("droneId", STRING),
    ],
);

static SCHEMAS: [&Schema; 3] = [&DELIVERY, &NEW_DELIVERY, &DELIVERY_UPDATE];

pub static DELIVERIES: SchemaRegistry = SchemaRegistry::new(&SCHEMAS);

/// Delivery ids arrive either as strings or as plain integers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeliveryId {
    Text(String),
    Number(i64),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: DeliveryId,
    pub at: String,
    pub to_address_id: String,
    pub order_item_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drone_id: Option<String>,
}

impl Model for Delivery {
    const TYPE_NAME: &'static str = "Delivery";
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDelivery {
    pub at: String,
    pub to_address_id: String,
    pub order_item_id: String,
}

impl Model for NewDelivery {
    const TYPE_NAME: &'static str = "NewDelivery";
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drone_id: Option<String>,
}

impl Model for DeliveryUpdate {
    const TYPE_NAME: &'static str = "DeliveryUpdate";
}

/// The one delivery this stub knows about.
pub fn sample_delivery(id: DeliveryId) -> Delivery {
    Delivery {
        id,
        at: "Tue, 08 Jul 2014 13:00:00 GMT".to_string(),
        to_address_id: "gi6w4fgi".to_string(),
        order_item_id: "6782798".to_string(),
        status: "completed".to_string(),
        drone_id: Some("f".to_string()),
    }
}

/// A rejected request body, rendered as a 400.
#[derive(Debug)]
pub struct Rejection(pub ValidationError);

impl From<ValidationError> for Rejection {
    fn from(err: ValidationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let kind = self.0.kind().as_str();
        let path = self.0.field_path();
        warn!(kind, path = %path, "rejected request body");
        let body = json!({
            "kind": kind,
            "path": path,
            "message": self.0.to_string(),
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

fn builder() -> TypedValueBuilder<'static> {
    TypedValueBuilder::new(&DELIVERIES)
}

pub fn app() -> Router {
    Router::new()
        .route("/deliveries", get(list_deliveries).post(create_delivery))
        .route(
            "/deliveries/{delivery_id}",
            get(get_delivery).patch(update_delivery).delete(cancel_delivery),
        )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_deliveries() -> Json<Vec<Delivery>> {
    Json(vec![sample_delivery(DeliveryId::Text("4".to_string()))])
}

async fn create_delivery(Json(raw): Json<Value>) -> Result<(StatusCode, Json<Delivery>), Rejection> {
    let input: NewDelivery = builder().build_model(&raw)?;
    info!(order_item_id = %input.order_item_id, "delivery requested");
    let delivery = Delivery {
        id: DeliveryId::Text("5".to_string()),
        at: input.at,
        to_address_id: input.to_address_id,
        order_item_id: input.order_item_id,
        status: "scheduled".to_string(),
        drone_id: None,
    };
    Ok((StatusCode::CREATED, Json(delivery)))
}

async fn get_delivery(Path(delivery_id): Path<String>) -> Json<Delivery> {
    Json(sample_delivery(DeliveryId::Text(delivery_id)))
}

/// Applies the fields present in the body. A `null` counts as absent, so
/// `{"droneId": null}` leaves the drone id untouched rather than clearing it.
async fn update_delivery(Path(delivery_id): Path<String>, Json(raw): Json<Value>) -> Result<Json<Delivery>, Rejection> {
    let update: DeliveryUpdate = builder().build_model(&raw)?;
    let mut delivery = sample_delivery(DeliveryId::Text(delivery_id));
    if let Some(at) = update.at {
        delivery.at = at;
    }
    if let Some(to_address_id) = update.to_address_id {
        delivery.to_address_id = to_address_id;
    }
    if let Some(status) = update.status {
        delivery.status = status;
    }
    if let Some(drone_id) = update.drone_id {
        delivery.drone_id = Some(drone_id);
    }
    info!(id = ?delivery.id, status = %delivery.status, "delivery updated");
    Ok(Json(delivery))
}

async fn cancel_delivery(Path(delivery_id): Path<String>) -> StatusCode {
    info!(%delivery_id, "delivery cancelled");
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use iyo_core::ErrorKind;

    #[test]
    fn schemas_resolve() {
        assert!(DELIVERIES.unresolved().is_empty());
    }

    #[test]
    fn delivery_id_accepts_string_or_integer() {
        let b = builder();
        let mut raw = serde_json::to_value(sample_delivery(DeliveryId::Text("4".to_string()))).unwrap();
        let text: Delivery = b.build_model(&raw).unwrap();
        assert_eq!(text.id, DeliveryId::Text("4".to_string()));

        raw["id"] = json!(4);
        let number: Delivery = b.build_model(&raw).unwrap();
        assert_eq!(number.id, DeliveryId::Number(4));

        raw["id"] = json!(u64::MAX);
        let err = b.build_model::<Delivery>(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field_path(), "id");

        raw["id"] = json!(true);
        let err = b.build_model::<Delivery>(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.field_path(), "id");
    }

    #[test]
    fn sample_delivery_serializes_with_wire_names() {
        let raw = serde_json::to_value(sample_delivery(DeliveryId::Text("4".to_string()))).unwrap();
        assert_eq!(raw["toAddressId"], "gi6w4fgi");
        assert_eq!(raw["orderItemId"], "6782798");
        assert_eq!(raw["droneId"], "f");
    }

    #[test]
    fn empty_update_is_valid() {
        let update: DeliveryUpdate = builder().build_model(&json!({})).unwrap();
        assert!(update.status.is_none());
        assert_eq!(builder().model_to_raw(&update).unwrap(), json!({}));
    }

    #[test]
    fn new_delivery_requires_order_item() {
        let err = builder()
            .build_model::<NewDelivery>(&json!({"at": "now", "toAddressId": "x"}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.field_path(), "orderItemId");
    }
}
