use axum::body::to_bytes;
use axum::response::Response;

/// Consume a response and parse its body as JSON.
pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a failure envelope with the given status and `kind`.
pub async fn assert_failure(resp: Response, status: u16, kind: &str) -> serde_json::Value {
    assert_eq!(resp.status().as_u16(), status, "unexpected status");
    let json = body_json(resp).await;
    assert_eq!(json["sucesso"], false, "body: {json}");
    assert_eq!(json["kind"], kind, "body: {json}");
    json
}
