//! Failure taxonomy for one segmentation request cycle.

use thiserror::Error;

pub const NO_IMAGE_SELECTED_MESSAGE: &str = "Por favor, selecione uma imagem primeiro.";
pub const SERVER_ERROR_MESSAGE: &str = "Erro ao processar a imagem";
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "Erro ao conectar com o servidor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Server,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{}", NO_IMAGE_SELECTED_MESSAGE)]
    NoImageSelected,
    #[error("unknown image option '{0}'")]
    UnknownImage(String),
    /// Non-success status, or a success status whose body reports `success: false`.
    /// The response body is never surfaced.
    #[error("{}", SERVER_ERROR_MESSAGE)]
    Server { status: u16 },
    #[error("{}", or_fallback(.0))]
    Transport(String),
    #[error("{}", or_fallback(.0))]
    Decode(String),
}

fn or_fallback(description: &str) -> &str {
    if description.trim().is_empty() {
        TRANSPORT_FALLBACK_MESSAGE
    } else {
        description
    }
}

impl RequestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoImageSelected | Self::UnknownImage(_) => ErrorCategory::Validation,
            Self::Server { .. } => ErrorCategory::Server,
            Self::Transport(_) | Self::Decode(_) => ErrorCategory::Transport,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::Server {
                status: status.as_u16(),
            };
        }
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
