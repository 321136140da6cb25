//! Backend commands queued from UI to backend worker.

use shared::domain::{RequestGeneration, SelectedImage};

#[derive(Debug)]
pub enum BackendCommand {
    Predict {
        generation: RequestGeneration,
        image: SelectedImage,
    },
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Predict { .. } => "predict",
            BackendCommand::CheckHealth => "check_health",
        }
    }
}
