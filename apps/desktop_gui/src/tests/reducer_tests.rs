use super::*;
use crate::controller::events::UiErrorContext;
use shared::error::PredictError;

fn pixel_image() -> PreviewImage {
    PreviewImage {
        width: 1,
        height: 1,
        rgba: vec![110, 169, 174, 255],
    }
}

fn cat_result(preprocessed: Option<&str>) -> PredictionResult {
    PredictionResult {
        prediction: "cat".to_string(),
        confidence: 97.0,
        preprocessed_image: preprocessed.map(str::to_string),
    }
}

fn server_error(message: &str) -> UiError {
    UiError::from_predict_error(UiErrorContext::Predict, PredictError::server(message))
}

#[test]
fn starts_idle_with_placeholders_and_hidden_but_preset_status() {
    let controller = ViewController::new();
    let view = controller.view();

    assert_eq!(view.ui_state, UiState::Idle);
    assert_eq!(view.original.image, None);
    assert_eq!(view.original.placeholder, "No image");
    assert_eq!(view.preprocessed.image, None);
    assert_eq!(view.preprocessed.placeholder, "Waiting");
    assert!(!view.prediction.visible);
    assert_eq!(view.prediction.placeholder, "No result");
    assert_eq!(view.prediction.placeholder_detail, "Confidence: 0%");
    assert!(!view.status.visible);
    assert!(view.status.spinner);
    assert_eq!(view.status.text, "Analyzing...");
    assert_eq!(view.notice, None);
}

#[test]
fn begin_analysis_shows_original_before_any_response() {
    let mut controller = ViewController::new();
    let generation = controller.begin_analysis("cat.png", Some(pixel_image()));

    let view = controller.view();
    assert_eq!(view.ui_state, UiState::Analyzing);
    assert_eq!(
        view.original.image.as_ref().map(|pane| &pane.image),
        Some(&pixel_image())
    );
    assert!(view.original.placeholder.is_empty());
    assert!(view.status.visible);
    assert!(view.status.spinner);
    assert_eq!(view.status.text, "Analyzing...");
    assert_eq!(view.selected_name.as_deref(), Some("cat.png"));
    assert_eq!(generation, controller.current_generation());
}

#[test]
fn undecodable_original_keeps_pane_empty_with_notice_text() {
    let mut controller = ViewController::new();
    controller.begin_analysis("scan.heic", None);

    let view = controller.view();
    assert_eq!(view.ui_state, UiState::Analyzing);
    assert_eq!(view.original.image, None);
    assert_eq!(view.original.placeholder, ORIGINAL_UNDECODABLE);
}

#[test]
fn show_result_renders_label_confidence_and_preprocessed_image() {
    let mut controller = ViewController::new();
    let generation = controller.begin_analysis("cat.png", Some(pixel_image()));

    let applied = controller.show_result(
        generation,
        &cat_result(Some("data:image/png;base64,AQID")),
        Some(pixel_image()),
    );
    assert!(applied);

    let view = controller.view();
    assert_eq!(view.ui_state, UiState::Resulted);
    assert_eq!(view.prediction.label, "cat");
    assert_eq!(view.prediction.confidence, "Confidence: 97%");
    assert!(view.prediction.visible);
    assert!(view.prediction.placeholder.is_empty());
    assert!(view.preprocessed.image.is_some());
    assert!(view.preprocessed.placeholder.is_empty());
    assert!(!view.status.spinner);
    assert_eq!(view.status.text, "Done");
    assert!(view.original.image.is_some());
}

#[test]
fn missing_preprocessed_image_leaves_placeholder() {
    let mut controller = ViewController::new();
    let generation = controller.begin_analysis("cat.png", Some(pixel_image()));

    assert!(controller.show_result(generation, &cat_result(None), None));

    let view = controller.view();
    assert_eq!(view.preprocessed.image, None);
    assert_eq!(view.preprocessed.placeholder, "Waiting");
    assert_eq!(view.prediction.label, "cat");
    assert_eq!(view.prediction.confidence, "Confidence: 97%");
}

#[test]
fn failure_surfaces_exact_message_and_resets_panes() {
    let mut controller = ViewController::new();
    let generation = controller.begin_analysis("cat.png", Some(pixel_image()));

    assert!(controller.fail_request(generation, &server_error("file too large")));

    let view = controller.view();
    assert_eq!(view.ui_state, UiState::Failed);
    let notice = view.notice.as_ref().expect("notice");
    assert_eq!(notice.title, "Prediction failed");
    assert_eq!(notice.message, "file too large");
    assert_eq!(notice.kind, ErrorKind::Server);
    assert_eq!(view.original.image, None);
    assert_eq!(view.original.placeholder, "No image");
    assert!(!view.status.visible);

    controller.dismiss_notice();
    assert_eq!(controller.ui_state(), UiState::Idle);
    assert_eq!(controller.view(), &ViewState::initial());
}

#[test]
fn reset_from_resulted_restores_placeholders_idempotently() {
    let mut controller = ViewController::new();
    let generation = controller.begin_analysis("cat.png", Some(pixel_image()));
    controller.show_result(generation, &cat_result(Some("x")), Some(pixel_image()));

    controller.try_again();
    assert_eq!(controller.view(), &ViewState::initial());
    controller.try_again();
    controller.reset();
    assert_eq!(controller.view(), &ViewState::initial());
    assert_eq!(controller.view().image_ids().count(), 0);
}

#[test]
fn stale_result_from_superseded_upload_is_dropped() {
    let mut controller = ViewController::new();
    let first = controller.begin_analysis("first.png", Some(pixel_image()));
    let second = controller.begin_analysis("second.png", Some(pixel_image()));
    assert!(second > first);

    assert!(!controller.show_result(first, &cat_result(None), None));
    assert_eq!(controller.ui_state(), UiState::Analyzing);
    assert_eq!(controller.view().selected_name.as_deref(), Some("second.png"));

    assert!(!controller.fail_request(first, &server_error("late failure")));
    assert_eq!(controller.view().notice, None);

    assert!(controller.show_result(second, &cat_result(None), None));
    assert_eq!(controller.ui_state(), UiState::Resulted);
}

#[test]
fn reset_invalidates_in_flight_request() {
    let mut controller = ViewController::new();
    let generation = controller.begin_analysis("cat.png", Some(pixel_image()));
    controller.reset();

    assert!(!controller.show_result(generation, &cat_result(None), None));
    assert_eq!(controller.view(), &ViewState::initial());
}

#[test]
fn new_upload_replaces_previous_result_wholesale() {
    let mut controller = ViewController::new();
    let generation = controller.begin_analysis("cat.png", Some(pixel_image()));
    controller.show_result(generation, &cat_result(Some("x")), Some(pixel_image()));
    let old_ids: Vec<_> = controller.view().image_ids().collect();

    controller.begin_analysis("dog.png", Some(pixel_image()));
    let view = controller.view();
    assert!(!view.prediction.visible);
    assert_eq!(view.preprocessed.image, None);
    let new_ids: Vec<_> = view.image_ids().collect();
    assert_eq!(new_ids.len(), 1);
    assert!(old_ids.iter().all(|id| !new_ids.contains(id)));
}

#[test]
fn validation_failure_without_request_returns_to_idle_after_dismiss() {
    let mut controller = ViewController::new();
    controller.show_failure(&UiError::validation(NOT_AN_IMAGE_MESSAGE));

    assert_eq!(controller.ui_state(), UiState::Failed);
    assert_eq!(
        controller.view().notice.as_ref().map(|n| n.message.as_str()),
        Some("Please upload an image")
    );
    controller.dismiss_notice();
    assert_eq!(controller.ui_state(), UiState::Idle);
}

#[test]
fn upload_while_notice_open_clears_notice() {
    let mut controller = ViewController::new();
    controller.show_failure(&UiError::validation(NOT_AN_IMAGE_MESSAGE));
    controller.begin_analysis("cat.png", Some(pixel_image()));

    assert_eq!(controller.view().notice, None);
    assert_eq!(controller.ui_state(), UiState::Analyzing);
}
