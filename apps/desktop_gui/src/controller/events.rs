//! Backend->UI events and error modeling for the desktop GUI controller.

use shared::{
    domain::{PredictionResult, RequestGeneration},
    error::{ErrorKind, PredictError},
};

use crate::media::PreviewImage;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    ServiceReachable(String),
    ServiceUnreachable(UiError),
    PredictionSucceeded {
        generation: RequestGeneration,
        result: PredictionResult,
        preprocessed: Option<PreviewImage>,
    },
    PredictionFailed {
        generation: RequestGeneration,
        error: UiError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Upload,
    Predict,
    HealthCheck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: ErrorKind,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(category: ErrorKind, context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, UiErrorContext::Upload, message)
    }

    pub fn from_predict_error(context: UiErrorContext, err: PredictError) -> Self {
        Self::new(err.kind, context, err.message)
    }

    /// Classifies free-form messages (command queue and backend startup
    /// failures) that carry no error kind of their own.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("disconnect")
            || lower.contains("unavailable")
            || lower.contains("queue")
        {
            ErrorKind::Transport
        } else {
            ErrorKind::Server
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> ErrorKind {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status-line rendering, e.g. `Server error: file too large`.
    pub fn status_line(&self) -> String {
        format!("{} error: {}", err_label(self.category), self.message)
    }
}

pub fn err_label(category: ErrorKind) -> &'static str {
    category.label()
}
