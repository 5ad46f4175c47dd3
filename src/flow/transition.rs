//! The pure flow transition: `(Session, Event) -> (Session, Vec<Effect>)`.
//!
//! No I/O happens here. Everything that touches the camera, the network or
//! the disk is returned as an [`Effect`] and executed by the driver.

use super::event::{Effect, Event, ExportKind};
use super::session::{AppState, FlowError, Notice, RequestKind, Session};
use crate::camera::CameraError;
use crate::generation::ErrorKind;

/// Apply `event` to `session`.
///
/// Events that are not valid in the current state leave the session
/// unchanged and produce no effects.
pub fn transition(mut session: Session, event: Event) -> (Session, Vec<Effect>) {
    let mut effects = Vec::new();

    match (session.state, event) {
        (_, Event::Reset) | (AppState::Error, Event::Retry) => {
            log::info!("Session {} ended, back to start", session.id);
            session.reset();
            effects.push(Effect::ReleaseCamera);
        }

        (_, Event::SetLanguage(language)) => session.language = language,

        (_, Event::ToggleMusic) => effects.push(Effect::ToggleMusic),

        (_, Event::DismissMessage) => {
            session.notice = None;
            if session.error.is_some_and(FlowError::is_transient) {
                session.error = None;
            }
        }

        (AppState::Hero, Event::Begin { credential_available }) => {
            if credential_available {
                session.error = None;
                session.state = AppState::GroupSelect;
            } else {
                session.error = Some(FlowError::CredentialMissing);
                session.state = AppState::KeyGate;
            }
        }

        (AppState::KeyGate, Event::CredentialSelected) => {
            session.error = None;
            session.state = AppState::GroupSelect;
        }

        (AppState::GroupSelect, Event::GroupChosen(group)) => {
            session.group_type = group;
            session.captured_image = None;
            session.state = AppState::Camera;
            effects.push(Effect::StartMusic);
            effects.push(Effect::AcquireCamera);
        }

        (AppState::Camera, Event::CameraFailed(err)) => {
            log::warn!("Camera unavailable: {}", err);
            session.error = Some(FlowError::CameraUnavailable);
            session.state = AppState::Error;
            effects.push(Effect::ReleaseCamera);
        }

        (AppState::Camera, Event::CaptureRequested) => effects.push(Effect::FreezeFrame),

        (AppState::Camera, Event::CaptureSucceeded(image)) => {
            session.captured_image = Some(image);
            session.state = AppState::StyleSelect;
            effects.push(Effect::ReleaseCamera);
        }

        (AppState::Camera, Event::CaptureFailed(err)) => match err {
            // No frame yet; the stream stays open and the user can try again
            CameraError::NoFrame => log::debug!("Capture ignored: no frame available"),
            other => {
                log::warn!("Capture failed: {}", other);
                session.error = Some(FlowError::CameraUnavailable);
                session.state = AppState::Error;
                effects.push(Effect::ReleaseCamera);
            }
        },

        (AppState::StyleSelect, Event::StyleChosen(style)) => session.selected_style = style,

        (AppState::StyleSelect, Event::StartGeneration) => {
            match (session.captured_image.clone(), session.pending) {
                (Some(image), None) => {
                    let token = session.issue(RequestKind::Generation);
                    session.result_image = None;
                    session.current_resolution = Default::default();
                    session.error = None;
                    session.notice = None;
                    session.state = AppState::Magic;
                    effects.push(Effect::Generate {
                        token,
                        image,
                        style: session.selected_style,
                        group: session.group_type,
                    });
                }
                (None, _) => log::debug!("Generation requested without a captured image"),
                (Some(_), Some(_)) => log::debug!("Generation already in flight"),
            }
        }

        (_, Event::GenerationFinished { token, result }) => {
            if !session.settle_generation(token) {
                log::debug!("Discarding stale generation result {:?}", token);
            } else {
                match result {
                    Ok(image) => {
                        log::info!("Portrait ready ({} bytes)", image.len());
                        session.result_image = Some(image);
                        session.state = AppState::Result;
                    }
                    Err(err) => {
                        log::error!("Generation failed: {}", err);
                        let (error, state) = match err.kind() {
                            ErrorKind::Auth(failure) => {
                                (FlowError::CredentialInvalid(failure), AppState::KeyGate)
                            }
                            ErrorKind::Generic => (FlowError::GenerationFailed, AppState::Error),
                        };
                        session.error = Some(error);
                        session.state = state;
                    }
                }
            }
        }

        (AppState::Result, Event::UpscaleRequested(level)) => {
            match (session.result_image.clone(), session.pending) {
                (Some(image), None) if level > session.current_resolution => {
                    let token = session.issue(RequestKind::Upscale(level));
                    session.error = None;
                    session.notice = None;
                    effects.push(Effect::Upscale {
                        token,
                        image,
                        style: session.selected_style,
                        level,
                    });
                }
                (_, Some(_)) => log::debug!("Upscale ignored: request in flight"),
                _ => log::debug!(
                    "Upscale to {} ignored at {}",
                    level,
                    session.current_resolution
                ),
            }
        }

        (_, Event::UpscaleFinished { token, result }) => match session.settle_upscale(token) {
            Some(level) => match result {
                Ok(image) => {
                    log::info!("Upscaled to {}", level);
                    session.result_image = Some(image);
                    session.current_resolution = session.current_resolution.max(level);
                    session.notice = Some(Notice::Upscaled(level));
                }
                Err(err) => {
                    log::error!("Upscale to {} failed: {}", level, err);
                    session.error = Some(FlowError::UpscaleFailed);
                }
            },
            None => log::debug!("Discarding stale upscale result {:?}", token),
        },

        (AppState::Result, Event::OpenNameEntry) if session.pending.is_none() => {
            session.name_entry_open = true
        }

        (AppState::Result, Event::NameEdited(name)) => session.first_name = name,

        (AppState::Result, Event::CancelNameEntry) => session.name_entry_open = false,

        (AppState::Result, Event::CreateCertificate) => {
            if session.can_create_certificate() {
                session.name_entry_open = false;
                session.state = AppState::Certificate;
            } else {
                log::debug!("Certificate needs an open name entry, a name and no upscale running");
            }
        }

        (AppState::Certificate, Event::Back) => session.state = AppState::Result,

        (AppState::Result | AppState::Certificate, Event::DownloadImage) => {
            if let Some(image) = session.result_image.clone() {
                effects.push(Effect::ExportImage {
                    session: session.id,
                    image,
                    name: session.first_name.trim().to_string(),
                    resolution: session.current_resolution,
                });
            }
        }

        (AppState::Certificate, Event::DownloadCertificate) => {
            match (&session.result_image, session.is_downloading) {
                (Some(image), false) => {
                    session.is_downloading = true;
                    effects.push(Effect::ExportCertificate {
                        session: session.id,
                        image: image.clone(),
                        name: session.first_name.trim().to_string(),
                        language: session.language,
                    });
                }
                (_, true) => log::debug!("Certificate download already running"),
                (None, false) => {}
            }
        }

        (_, Event::ExportFinished { session: id, kind, result }) => {
            if id != session.id {
                log::debug!("Discarding export result from session {}", id);
            } else {
                // Only the certificate download holds the flag
                if kind == ExportKind::Certificate {
                    session.is_downloading = false;
                }
                match result {
                    Ok(path) => session.notice = Some(Notice::Saved(path)),
                    Err(err) => {
                        log::error!("Export failed: {}", err);
                        session.error = Some(FlowError::ExportFailed);
                    }
                }
            }
        }

        (state, event) => log::debug!("Ignoring {:?} in {:?}", event, state),
    }

    debug_assert!(
        session.check_invariants().is_ok(),
        "{:?}",
        session.check_invariants()
    );
    (session, effects)
}
