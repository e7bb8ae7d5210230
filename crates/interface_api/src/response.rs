//! Response envelope
//!
//! Every endpoint answers with the same shape:
//! `{"success": bool, "data": ... | null, "message": "..."}`.
//! Error responses additionally carry a machine-readable `error` code.

use serde::Serialize;

/// Uniform API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying a payload
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
        }
    }

    /// Failed response; `data` is always null
    pub fn err(message: impl Into<String>, code: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            error: Some(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(json!({"id": 1}), "saved")).unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["id"], json!(1));
        assert_eq!(body["message"], json!("saved"));
        assert!(body.get("error").is_none());
    }

    #[test]
    fn err_envelope_has_null_data_and_code() {
        let body =
            serde_json::to_value(ApiResponse::<()>::err("Plan not found", "not_found")).unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["data"], json!(null));
        assert_eq!(body["error"], json!("not_found"));
    }
}
