//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, PredictionClient, PredictionService};
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::{self, PreviewImage};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                send_ui_event(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    )),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let service: Arc<dyn PredictionService> = match PredictionClient::new(&settings) {
            Ok(client) => {
                tracing::info!(endpoint = %client.endpoint(), "backend worker ready");
                send_ui_event(
                    &ui_tx,
                    UiEvent::Info(format!("Backend worker ready for {}", client.endpoint())),
                );
                Arc::new(client)
            }
            Err(err) => {
                send_ui_event(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )),
                );
                tracing::error!("failed to build prediction client: {err:#}");
                return;
            }
        };

        // One task per command. Stale generations are dropped by the UI.
        while let Ok(cmd) = cmd_rx.recv() {
            let service = Arc::clone(&service);
            let ui_tx = ui_tx.clone();
            runtime.spawn(async move {
                handle_command(service.as_ref(), cmd, &ui_tx).await;
            });
        }
        tracing::info!("ui command queue closed; backend worker exiting");
    });
}

pub(crate) async fn handle_command(
    service: &dyn PredictionService,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) {
    match cmd {
        BackendCommand::Predict { generation, image } => {
            tracing::info!(
                generation = generation.0,
                filename = %image.filename,
                "backend: predict"
            );
            let event = match service.predict(&image).await {
                Ok(result) => {
                    let preprocessed = match result.preprocessed_image.as_deref() {
                        Some(reference) => load_preprocessed(service, reference).await,
                        None => None,
                    };
                    UiEvent::PredictionSucceeded {
                        generation,
                        result,
                        preprocessed,
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        generation = generation.0,
                        kind = ?err.kind,
                        "backend: predict failed: {err}"
                    );
                    UiEvent::PredictionFailed {
                        generation,
                        error: UiError::from_predict_error(UiErrorContext::Predict, err),
                    }
                }
            };
            send_ui_event(ui_tx, event);
        }
        BackendCommand::CheckHealth => {
            let event = match service.health().await {
                Ok(message) => UiEvent::ServiceReachable(message),
                Err(err) => {
                    tracing::warn!("backend: health check failed: {err}");
                    UiEvent::ServiceUnreachable(UiError::from_predict_error(
                        UiErrorContext::HealthCheck,
                        err,
                    ))
                }
            };
            send_ui_event(ui_tx, event);
        }
    }
}

/// A preview that cannot be loaded leaves the pane at its placeholder; it is
/// never a reason to fail the prediction.
async fn load_preprocessed(service: &dyn PredictionService, reference: &str) -> Option<PreviewImage> {
    let bytes = match service.load_preview(reference).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!("backend: preprocessed image unavailable: {err}");
            return None;
        }
    };
    match media::decode_preview_image(&bytes) {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!("backend: preprocessed image could not be decoded: {err}");
            None
        }
    }
}

fn send_ui_event(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    match ui_tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => tracing::warn!("backend->ui event queue is full"),
        Err(TrySendError::Disconnected(_)) => tracing::debug!("ui event queue closed"),
    }
}
