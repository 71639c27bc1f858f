/*!
 * Error types for the proofmark application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Build the matching variant for a non-success HTTP status
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }

    /// Message shown to the person running the review, one per failure class
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthenticationError(_) => {
                "API 인증에 실패했습니다. API 키를 확인해주세요.".to_string()
            }
            Self::RateLimitExceeded(_) => {
                "API 요청 한도를 초과했습니다. 잠시 후 다시 시도해주세요.".to_string()
            }
            Self::ApiError { status_code, .. } if *status_code >= 500 => {
                "AI 서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요.".to_string()
            }
            Self::ConnectionError(_) => {
                "AI 서버에 연결할 수 없습니다. 네트워크 상태를 확인해주세요.".to_string()
            }
            other => format!("검토 중 오류가 발생했습니다: {}", other),
        }
    }
}

/// Errors that can occur while reading an uploaded document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The bytes do not start with a PDF signature
    #[error("Not a valid PDF file")]
    NotPdf,

    /// The document exceeds the upload limit
    #[error("File is {size} bytes, larger than the {limit} byte limit")]
    TooLarge {
        /// Actual size in bytes
        size: usize,
        /// Accepted maximum in bytes
        limit: usize,
    },

    /// The PDF could not be parsed or its text could not be extracted
    #[error("Unreadable document: {0}")]
    Unreadable(String),

    /// Extraction succeeded but produced no text (likely a scanned image PDF)
    #[error("No text could be extracted from the document; it may be a scanned image PDF")]
    NoText,
}

/// Errors that abort a review session
#[derive(Error, Debug)]
pub enum ReviewError {
    /// The session was started without any pages
    #[error("No pages to review")]
    NoPages,

    /// A pass index outside of 1..=3 was requested
    #[error("Invalid review pass index: {0} (expected 1-3)")]
    InvalidPassIndex(i64),

    /// Extraction failed before the first pass
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// The proofreading collaborator failed
    #[error("Review pass {pass} failed: {source}")]
    Provider {
        /// Pass that was running when the call failed
        pass: u8,
        /// Underlying provider failure
        #[source]
        source: ProviderError,
    },
}

impl ReviewError {
    /// Message shown to the person running the review
    pub fn user_message(&self) -> String {
        match self {
            Self::NoPages => "검토할 페이지가 없습니다".to_string(),
            Self::InvalidPassIndex(_) => "잘못된 검토 번호입니다".to_string(),
            Self::Document(DocumentError::NotPdf) => "유효한 PDF 파일이 아닙니다".to_string(),
            Self::Document(DocumentError::TooLarge { .. }) => {
                "파일 크기가 50MB를 초과합니다".to_string()
            }
            Self::Document(DocumentError::Unreadable(_)) => {
                "PDF 파일을 읽을 수 없습니다".to_string()
            }
            Self::Document(DocumentError::NoText) => {
                "PDF에서 텍스트를 추출할 수 없습니다. 스캔된 이미지 PDF일 수 있습니다.".to_string()
            }
            Self::Provider { source, .. } => source.user_message(),
        }
    }
}

/// Errors that can occur while exporting results
#[derive(Error, Debug)]
pub enum ExportError {
    /// Format selector was neither `xlsx` nor `csv`
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// There is nothing to export
    #[error("No errors to export")]
    Empty,

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook generation failed
    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Writing the payload failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document extraction
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from a review session
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Error from export
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
