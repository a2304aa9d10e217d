use axum::Json;
use serde::Serialize;

/// Success envelope: `{"status":"ok","data":...}`.
///
/// Errors use [`ApiError`](crate::error::api::ApiError) instead.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { status: "ok", data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_data() {
        let Json(body) = ok(serde_json::json!({"alive": true}));

        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({"status": "ok", "data": {"alive": true}})
        );
    }
}
