use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{OpenVoxError, OpenVoxResult};

/// Success envelope returned by the OpenVox View API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    /// The payload of the successful operation.
    #[serde(rename = "Data")]
    pub data: T,
}

impl<T> BaseResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Failure envelope returned by the OpenVox View API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason for the failure.
    #[serde(rename = "Error")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Either envelope, discriminated by which field is present.
///
/// `Data` is tried first, so a body carrying both fields decodes as a success.
/// A body with neither field fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success(BaseResponse<T>),
    Failure(ErrorResponse),
}

impl<T> ApiResponse<T> {
    /// Returns true if this is a success envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    /// Converts the envelope into the payload, or an `ApiError` carrying
    /// `status` and the error message.
    pub fn into_result(self, status: StatusCode) -> OpenVoxResult<T> {
        match self {
            ApiResponse::Success(response) => Ok(response.data),
            ApiResponse::Failure(response) => Err(OpenVoxError::ApiError {
                status,
                message: response.error,
            }),
        }
    }
}

impl<T> From<BaseResponse<T>> for ApiResponse<T> {
    fn from(response: BaseResponse<T>) -> Self {
        ApiResponse::Success(response)
    }
}

impl<T> From<ErrorResponse> for ApiResponse<T> {
    fn from(response: ErrorResponse) -> Self {
        ApiResponse::Failure(response)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::models::meta::ApiVersion;

    #[test]
    fn test_base_response_uses_capitalized_field() {
        let response = BaseResponse::new(vec![1, 2, 3]);
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "Data": [1, 2, 3] }));

        let decoded: BaseResponse<Vec<u32>> =
            serde_json::from_value(json!({ "Data": [1, 2, 3] })).unwrap();
        assert_eq!(decoded.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_lowercase_data_field_is_rejected() {
        let result = serde_json::from_value::<BaseResponse<u32>>(json!({ "data": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_error_response_decodes_message() {
        let decoded: ErrorResponse =
            serde_json::from_value(json!({ "Error": "some failure" })).unwrap();
        assert_eq!(decoded.error, "some failure");
    }

    #[test]
    fn test_api_response_discriminates_by_field() {
        let success: ApiResponse<ApiVersion> =
            serde_json::from_value(json!({ "Data": { "Version": "1.2.3" } })).unwrap();
        assert!(success.is_success());

        let failure: ApiResponse<ApiVersion> =
            serde_json::from_value(json!({ "Error": "no version" })).unwrap();
        assert_eq!(failure, ApiResponse::Failure(ErrorResponse::new("no version")));

        let neither = serde_json::from_value::<ApiResponse<ApiVersion>>(json!({}));
        assert!(neither.is_err());
    }

    #[test]
    fn test_null_data_is_a_success_for_unit_payloads() {
        let response: ApiResponse<()> = serde_json::from_value(json!({ "Data": null })).unwrap();
        assert!(response.into_result(StatusCode::OK).is_ok());
    }

    #[test]
    fn test_into_result_carries_status_and_message() {
        let response: ApiResponse<ApiVersion> = ErrorResponse::new("boom").into();
        match response.into_result(StatusCode::INTERNAL_SERVER_ERROR) {
            Err(OpenVoxError::ApiError { status, message }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "boom");
            }
            other => panic!("Expected ApiError, got {other:?}"),
        }
    }
}
