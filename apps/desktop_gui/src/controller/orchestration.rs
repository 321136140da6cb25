//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::{is_image_media_type, RequestGeneration, SelectedImage};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};
use crate::controller::reducer::{ViewController, NOT_AN_IMAGE_MESSAGE};
use crate::media::{self, FileSelection};

/// Queues `cmd` for the backend worker. Returns `false` when it could not be
/// queued; `status` then explains why.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            false
        }
    }
}

/// The upload flow: validate, show the image, queue the prediction.
///
/// Non-image selections surface a notice and never reach the backend.
pub fn submit_selection(
    controller: &mut ViewController,
    cmd_tx: &Sender<BackendCommand>,
    selection: FileSelection,
    status: &mut String,
) -> Option<RequestGeneration> {
    let media_type = selection.media_type.clone().unwrap_or_default();
    if !is_image_media_type(&media_type) {
        tracing::info!(
            filename = %selection.name,
            media_type = %media_type,
            "upload: rejected non-image selection"
        );
        let err = UiError::validation(NOT_AN_IMAGE_MESSAGE);
        *status = err.status_line();
        controller.show_failure(&err);
        return None;
    }

    let bytes = match selection.read_bytes() {
        Ok(bytes) => bytes,
        Err(err) => {
            let err = UiError::validation(format!("Could not read {}: {err}", selection.name));
            *status = err.status_line();
            controller.show_failure(&err);
            return None;
        }
    };

    let display = match media::decode_preview_image(&bytes) {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!(filename = %selection.name, "upload: local preview decode failed: {err}");
            None
        }
    };

    let generation = controller.begin_analysis(&selection.name, display);
    *status = format!("Analyzing {}", selection.name);
    let queued = dispatch_backend_command(
        cmd_tx,
        BackendCommand::Predict {
            generation,
            image: SelectedImage::new(selection.name, media_type, bytes),
        },
        status,
    );
    if !queued {
        let err = UiError::from_message(UiErrorContext::Predict, status.clone());
        controller.fail_request(generation, &err);
        return None;
    }
    Some(generation)
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::controller::reducer::UiState;
    use crate::media::encode_test_png;

    #[test]
    fn non_image_selection_issues_no_request() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut controller = ViewController::new();
        let mut status = String::new();

        let selection = FileSelection::from_bytes(
            "report.pdf",
            Some("application/pdf".to_string()),
            b"%PDF-1.7".to_vec(),
        );
        let generation = submit_selection(&mut controller, &cmd_tx, selection, &mut status);

        assert_eq!(generation, None);
        assert!(cmd_rx.try_recv().is_err());
        assert_eq!(controller.ui_state(), UiState::Failed);
        assert_eq!(
            controller.view().notice.as_ref().map(|n| n.message.as_str()),
            Some("Please upload an image")
        );
        controller.dismiss_notice();
        assert_eq!(controller.ui_state(), UiState::Idle);
    }

    #[test]
    fn selection_without_media_type_is_rejected() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut controller = ViewController::new();
        let mut status = String::new();

        let selection = FileSelection::from_bytes("mystery", None, vec![1, 2, 3]);
        assert_eq!(
            submit_selection(&mut controller, &cmd_tx, selection, &mut status),
            None
        );
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn image_selection_shows_original_and_queues_prediction() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut controller = ViewController::new();
        let mut status = String::new();
        let png = encode_test_png(8, 8);

        let selection =
            FileSelection::from_bytes("cat.png", Some("image/png".to_string()), png.clone());
        let generation =
            submit_selection(&mut controller, &cmd_tx, selection, &mut status).expect("queued");

        assert_eq!(controller.ui_state(), UiState::Analyzing);
        assert!(controller.view().original.image.is_some());
        assert_eq!(status, "Analyzing cat.png");

        match cmd_rx.try_recv().expect("predict command") {
            BackendCommand::Predict {
                generation: queued,
                image,
            } => {
                assert_eq!(queued, generation);
                assert_eq!(image.filename, "cat.png");
                assert_eq!(image.media_type, "image/png");
                assert_eq!(image.bytes, png);
            }
            BackendCommand::CheckHealth => panic!("unexpected health check"),
        }
    }

    #[test]
    fn disconnected_backend_fails_the_upload_instead_of_spinning() {
        let (cmd_tx, cmd_rx) = bounded(4);
        drop(cmd_rx);
        let mut controller = ViewController::new();
        let mut status = String::new();

        let selection = FileSelection::from_bytes(
            "cat.png",
            Some("image/png".to_string()),
            encode_test_png(2, 2),
        );
        assert_eq!(
            submit_selection(&mut controller, &cmd_tx, selection, &mut status),
            None
        );
        assert_eq!(controller.ui_state(), UiState::Failed);
        assert!(status.contains("disconnected"));
    }

    #[test]
    fn full_queue_reports_retry_status() {
        let (cmd_tx, _cmd_rx) = bounded(1);
        let mut status = String::new();
        assert!(dispatch_backend_command(
            &cmd_tx,
            BackendCommand::CheckHealth,
            &mut status
        ));
        assert!(!dispatch_backend_command(
            &cmd_tx,
            BackendCommand::CheckHealth,
            &mut status
        ));
        assert_eq!(status, "UI command queue is full; please retry");
    }
}
