use axum::Json;
use serde::Serialize;

/// Success envelope: the payload's fields are flattened next to `"sucesso": true`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub sucesso: bool,
    #[serde(flatten)]
    pub data: T,
}

/// Wrap `data` in a success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        sucesso: true,
        data,
    })
}

/// Envelope with no payload besides `"sucesso": true`.
pub fn done() -> Json<Envelope<serde_json::Map<String, serde_json::Value>>> {
    ok(serde_json::Map::new())
}
