//! API error type for platform requests.

/// Structured error for a non-success HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub http_status: u16,
    pub message: String,
    /// Whether the stored target credentials need replacing
    pub requires_login: bool,
}

impl ApiError {
    /// Create from HTTP status code and response body
    pub fn from_http_response(http_status: u16, body: String) -> Self {
        let requires_login = matches!(http_status, 401 | 403);

        let message = match http_status {
            401 => format!(
                "Authentication failed (HTTP {}). Your token may have expired. \
                 Please run 'appbits target set' with a fresh token.",
                http_status
            ),
            403 => format!(
                "Permission denied (HTTP {}). Check that your token may push to this space.",
                http_status
            ),
            413 => format!(
                "Application too large (HTTP {}). Add build outputs to .cfignore.",
                http_status
            ),
            _ if body.is_empty() => format!("API error (HTTP {})", http_status),
            _ => format!("API error (HTTP {}): {}", http_status, body),
        };

        Self {
            http_status,
            message,
            requires_login,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
