//! HTTP rendering of [`AppError`]
//!
//! Body shape: `{type, title, status, code, message, action}`.

#[cfg(feature = "axum")]
mod render {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use serde_json::json;

    use crate::error::app_error::AppError;

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            let body = json!({
                "type": format!("https://httpstatuses.io/{}", status.as_u16()),
                "title": self.kind().as_str(),
                "status": status.as_u16(),
                "code": self.code(),
                "message": self.message(),
                "action": self.action(),
            });

            (status, Json(body)).into_response()
        }
    }

}
