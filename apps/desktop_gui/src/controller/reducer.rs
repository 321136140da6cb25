//! View State Controller: the four UI regions as one `ViewState` value and the
//! transitions between Idle, Analyzing, Resulted and Failed.
//!
//! Every completion is tagged with the `RequestGeneration` handed out by
//! [`ViewController::begin_analysis`]; anything older than the current
//! generation is dropped, so the view always reflects the most recently
//! started upload.

use shared::{
    domain::{ImageId, PredictionResult, RequestGeneration},
    error::ErrorKind,
};
use tracing::debug;

use crate::controller::events::UiError;
use crate::media::PreviewImage;

pub const ORIGINAL_PLACEHOLDER: &str = "No image";
pub const ORIGINAL_UNDECODABLE: &str = "Preview unavailable";
pub const PREPROCESSED_PLACEHOLDER: &str = "Waiting";
pub const RESULT_PLACEHOLDER: &str = "No result";
pub const RESULT_PLACEHOLDER_CONFIDENCE: &str = "Confidence: 0%";
pub const STATUS_ANALYZING: &str = "Analyzing...";
pub const STATUS_DONE: &str = "Done";
pub const FAILURE_TITLE: &str = "Prediction failed";
pub const NOT_AN_IMAGE_MESSAGE: &str = "Please upload an image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Analyzing,
    Resulted,
    /// Panes are already reset; the failure notice is still open.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaneImage {
    pub id: ImageId,
    pub image: PreviewImage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImagePane {
    pub image: Option<PaneImage>,
    pub placeholder: String,
}

impl ImagePane {
    fn empty(placeholder: &str) -> Self {
        Self {
            image: None,
            placeholder: placeholder.to_string(),
        }
    }

    fn show(&mut self, image: PaneImage) {
        self.image = Some(image);
        self.placeholder.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionCard {
    pub visible: bool,
    pub label: String,
    pub confidence: String,
    pub placeholder: String,
    pub placeholder_detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPanel {
    pub visible: bool,
    pub spinner: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub ui_state: UiState,
    pub original: ImagePane,
    pub preprocessed: ImagePane,
    pub prediction: PredictionCard,
    pub status: StatusPanel,
    pub notice: Option<Notice>,
    pub selected_name: Option<String>,
}

impl ViewState {
    /// The placeholder layout. The status panel is hidden but already reads
    /// "Analyzing...".
    pub fn initial() -> Self {
        Self {
            ui_state: UiState::Idle,
            original: ImagePane::empty(ORIGINAL_PLACEHOLDER),
            preprocessed: ImagePane::empty(PREPROCESSED_PLACEHOLDER),
            prediction: PredictionCard {
                visible: false,
                label: String::new(),
                confidence: String::new(),
                placeholder: RESULT_PLACEHOLDER.to_string(),
                placeholder_detail: RESULT_PLACEHOLDER_CONFIDENCE.to_string(),
            },
            status: StatusPanel {
                visible: false,
                spinner: true,
                text: STATUS_ANALYZING.to_string(),
            },
            notice: None,
            selected_name: None,
        }
    }

    /// Images currently referenced by the view; textures for anything else
    /// can be released.
    pub fn image_ids(&self) -> impl Iterator<Item = ImageId> + '_ {
        [&self.original.image, &self.preprocessed.image]
            .into_iter()
            .flatten()
            .map(|pane_image| pane_image.id)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug)]
pub struct ViewController {
    view: ViewState,
    generation: RequestGeneration,
    last_image_id: ImageId,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            view: ViewState::initial(),
            generation: RequestGeneration::default(),
            last_image_id: ImageId::default(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn ui_state(&self) -> UiState {
        self.view.ui_state
    }

    pub fn current_generation(&self) -> RequestGeneration {
        self.generation
    }

    fn allocate_image(&mut self, image: PreviewImage) -> PaneImage {
        self.last_image_id = self.last_image_id.next();
        PaneImage {
            id: self.last_image_id,
            image,
        }
    }

    /// Back to placeholders. Any request still in flight is invalidated.
    pub fn reset(&mut self) {
        self.generation = self.generation.next();
        self.view = ViewState::initial();
    }

    /// Shows the selected image right away and starts a new request
    /// generation. The media type must already be validated.
    pub fn begin_analysis(
        &mut self,
        filename: &str,
        display: Option<PreviewImage>,
    ) -> RequestGeneration {
        self.generation = self.generation.next();

        let mut view = ViewState::initial();
        match display {
            Some(image) => {
                let pane_image = self.allocate_image(image);
                view.original.show(pane_image);
            }
            None => view.original.placeholder = ORIGINAL_UNDECODABLE.to_string(),
        }
        view.status = StatusPanel {
            visible: true,
            spinner: true,
            text: STATUS_ANALYZING.to_string(),
        };
        view.selected_name = Some(filename.to_string());
        view.ui_state = UiState::Analyzing;
        self.view = view;

        debug!(generation = self.generation.0, filename, "view: analysis started");
        self.generation
    }

    /// Renders a completed prediction. Returns `false` when `generation` is
    /// stale and nothing changed.
    pub fn show_result(
        &mut self,
        generation: RequestGeneration,
        result: &PredictionResult,
        preprocessed: Option<PreviewImage>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                generation = generation.0,
                current = self.generation.0,
                "view: dropping stale prediction result"
            );
            return false;
        }

        if let Some(image) = preprocessed {
            let pane_image = self.allocate_image(image);
            self.view.preprocessed.show(pane_image);
        }

        let card = &mut self.view.prediction;
        card.label = result.prediction.clone();
        card.confidence = result.confidence_text();
        card.visible = true;
        card.placeholder.clear();
        card.placeholder_detail.clear();

        self.view.status.spinner = false;
        self.view.status.text = STATUS_DONE.to_string();
        self.view.ui_state = UiState::Resulted;
        true
    }

    /// Surfaces `error` in a blocking notice, then resets every pane.
    pub fn show_failure(&mut self, error: &UiError) {
        self.reset();
        self.view.notice = Some(Notice {
            title: FAILURE_TITLE.to_string(),
            message: error.message().to_string(),
            kind: error.category(),
        });
        self.view.ui_state = UiState::Failed;
    }

    /// Failure of the request tagged `generation`. Stale failures are ignored.
    pub fn fail_request(&mut self, generation: RequestGeneration, error: &UiError) -> bool {
        if generation != self.generation {
            debug!(
                generation = generation.0,
                current = self.generation.0,
                "view: dropping stale prediction failure"
            );
            return false;
        }
        self.show_failure(error);
        true
    }

    pub fn dismiss_notice(&mut self) {
        self.view.notice = None;
        if self.view.ui_state == UiState::Failed {
            self.view.ui_state = UiState::Idle;
        }
    }

    pub fn try_again(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
