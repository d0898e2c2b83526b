//! Error handling for the platform API module

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Response body could not be decoded as the expected JSON shape
    #[error("Decoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// An error status returned by the platform.
    #[error("API error: {status} - {message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // HTTP errors display the status code and the body text.
    fn http_error_display_includes_status_and_body() {
        let err = ApiError::Http {
            status: 404,
            message: "function not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 404 - function not found");
    }
}
