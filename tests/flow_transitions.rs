//! Tests for the pure flow transition.
//!
//! These tests cover:
//! - The main user journeys through the booth
//! - Error routing (credential, camera, generation, upscale, export)
//! - Resolution monotonicity and request mutual exclusion
//! - Discarding late results after a reset

use std::path::PathBuf;

use elf_booth::camera::CameraError;
use elf_booth::export::ExportError;
use elf_booth::flow::{
    transition, AppState, Effect, Event, ExportKind, FlowError, Notice, RequestToken, Session,
};
use elf_booth::generation::{AuthFailure, ElfStyle, GenerationError, GroupType, UpscaleLevel};
use elf_booth::i18n::Language;
use elf_booth::media::EncodedImage;

fn photo() -> EncodedImage {
    EncodedImage::png(vec![1u8, 1, 1])
}

fn portrait(tag: u8) -> EncodedImage {
    EncodedImage::png(vec![9u8, tag])
}

/// Apply events in order, checking invariants after each step.
fn run(session: Session, events: Vec<Event>) -> (Session, Vec<Effect>) {
    let mut session = session;
    let mut last = Vec::new();
    for event in events {
        let (next, effects) = transition(session, event);
        assert!(next.check_invariants().is_ok(), "{:?}", next.check_invariants());
        session = next;
        last = effects;
    }
    (session, last)
}

fn generate_token(effects: &[Effect]) -> RequestToken {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Generate { token, .. } => Some(*token),
            _ => None,
        })
        .expect("no generate effect")
}

fn upscale_token(effects: &[Effect]) -> RequestToken {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Upscale { token, .. } => Some(*token),
            _ => None,
        })
        .expect("no upscale effect")
}

fn at_camera() -> Session {
    run(
        Session::default(),
        vec![
            Event::Begin {
                credential_available: true,
            },
            Event::GroupChosen(GroupType::Single),
        ],
    )
    .0
}

fn at_magic() -> (Session, RequestToken) {
    let (session, effects) = run(
        at_camera(),
        vec![
            Event::CaptureSucceeded(photo()),
            Event::StyleChosen(ElfStyle::Forest),
            Event::StartGeneration,
        ],
    );
    (session, generate_token(&effects))
}

fn at_result() -> Session {
    let (session, token) = at_magic();
    run(
        session,
        vec![Event::GenerationFinished {
            token,
            result: Ok(portrait(1)),
        }],
    )
    .0
}

// === Journeys ===

#[test]
fn test_begin_with_credential_goes_to_group_select() {
    let (session, effects) = run(
        Session::default(),
        vec![Event::Begin {
            credential_available: true,
        }],
    );
    assert_eq!(session.state(), AppState::GroupSelect);
    assert!(effects.is_empty());
}

#[test]
fn test_begin_without_credential_goes_to_key_gate() {
    let (session, _) = run(
        Session::default(),
        vec![Event::Begin {
            credential_available: false,
        }],
    );
    assert_eq!(session.state(), AppState::KeyGate);
    assert_eq!(session.error(), Some(FlowError::CredentialMissing));

    let (session, _) = run(session, vec![Event::CredentialSelected]);
    assert_eq!(session.state(), AppState::GroupSelect);
    assert_eq!(session.error(), None);
}

#[test]
fn test_choosing_group_starts_music_and_camera() {
    let (session, effects) = run(
        Session::default(),
        vec![
            Event::Begin {
                credential_available: true,
            },
            Event::GroupChosen(GroupType::Group),
        ],
    );
    assert_eq!(session.state(), AppState::Camera);
    assert_eq!(session.group_type(), GroupType::Group);
    assert_eq!(effects, vec![Effect::StartMusic, Effect::AcquireCamera]);
}

#[test]
fn test_capture_moves_to_style_select_and_releases_camera() {
    let (session, effects) = run(at_camera(), vec![Event::CaptureRequested]);
    assert_eq!(effects, vec![Effect::FreezeFrame]);

    let (session, effects) = run(session, vec![Event::CaptureSucceeded(photo())]);
    assert_eq!(session.state(), AppState::StyleSelect);
    assert_eq!(session.captured_image(), Some(&photo()));
    assert_eq!(effects, vec![Effect::ReleaseCamera]);
}

#[test]
fn test_generation_success_shows_result() {
    let (session, token) = at_magic();
    assert!(session.is_processing());
    assert_eq!(session.selected_style(), ElfStyle::Forest);

    let (session, _) = run(
        session,
        vec![Event::GenerationFinished {
            token,
            result: Ok(portrait(1)),
        }],
    );
    assert_eq!(session.state(), AppState::Result);
    assert_eq!(session.result_image(), Some(&portrait(1)));
    assert_eq!(session.current_resolution(), UpscaleLevel::K1);
    assert!(!session.is_processing());
}

#[test]
fn test_certificate_needs_open_entry_and_name() {
    let session = at_result();

    let (session, _) = run(session, vec![Event::CreateCertificate]);
    assert_eq!(session.state(), AppState::Result);

    let (session, _) = run(
        session,
        vec![Event::OpenNameEntry, Event::NameEdited("   ".to_string())],
    );
    assert!(!session.can_create_certificate());
    let (session, _) = run(session, vec![Event::CreateCertificate]);
    assert_eq!(session.state(), AppState::Result);

    let (session, _) = run(
        session,
        vec![
            Event::NameEdited("Aino".to_string()),
            Event::CreateCertificate,
        ],
    );
    assert_eq!(session.state(), AppState::Certificate);
    assert_eq!(session.first_name(), "Aino");

    let (session, _) = run(session, vec![Event::Back]);
    assert_eq!(session.state(), AppState::Result);
    assert!(session.result_image().is_some());
}

#[test]
fn test_cancel_name_entry_blocks_certificate() {
    let (session, _) = run(
        at_result(),
        vec![
            Event::OpenNameEntry,
            Event::NameEdited("Aino".to_string()),
            Event::CancelNameEntry,
            Event::CreateCertificate,
        ],
    );
    assert_eq!(session.state(), AppState::Result);
}

// === Error routing ===

#[test]
fn test_camera_failure_goes_to_error_screen() {
    let (session, effects) = run(
        at_camera(),
        vec![Event::CameraFailed(CameraError::PermissionDenied)],
    );
    assert_eq!(session.state(), AppState::Error);
    assert_eq!(session.error(), Some(FlowError::CameraUnavailable));
    assert_eq!(
        session.error_message(),
        Some(Language::Fi.strings().camera_unavailable)
    );
    assert!(effects.contains(&Effect::ReleaseCamera));
}

#[test]
fn test_auth_failure_keeps_captured_image() {
    let (session, token) = at_magic();
    let (session, _) = run(
        session,
        vec![Event::GenerationFinished {
            token,
            result: Err(GenerationError::auth(
                AuthFailure::KeyNotFound,
                "Requested entity was not found.",
            )),
        }],
    );
    assert_eq!(session.state(), AppState::KeyGate);
    assert_eq!(session.captured_image(), Some(&photo()));
    assert_eq!(
        session.error(),
        Some(FlowError::CredentialInvalid(AuthFailure::KeyNotFound))
    );
    assert!(session.result_image().is_none());
}

#[test]
fn test_generic_generation_failure_goes_to_error_and_retry_resets() {
    let (session, token) = at_magic();
    let (session, _) = run(
        session,
        vec![Event::GenerationFinished {
            token,
            result: Err(GenerationError::NoImage {
                reason: "SAFETY".to_string(),
            }),
        }],
    );
    assert_eq!(session.state(), AppState::Error);
    assert_eq!(session.error(), Some(FlowError::GenerationFailed));

    let (session, effects) = run(session, vec![Event::Retry]);
    assert_eq!(session.state(), AppState::Hero);
    assert_eq!(session.error(), None);
    assert!(session.captured_image().is_none());
    assert_eq!(effects, vec![Effect::ReleaseCamera]);
}

#[test]
fn test_upscale_to_4k() {
    let (session, effects) = run(at_result(), vec![Event::UpscaleRequested(UpscaleLevel::K4)]);
    assert!(session.is_upscaling());
    let token = upscale_token(&effects);

    let (session, _) = run(
        session,
        vec![Event::UpscaleFinished {
            token,
            result: Ok(portrait(4)),
        }],
    );
    assert_eq!(session.state(), AppState::Result);
    assert_eq!(session.current_resolution(), UpscaleLevel::K4);
    assert_eq!(session.result_image(), Some(&portrait(4)));
    assert_eq!(session.notice(), Some(&Notice::Upscaled(UpscaleLevel::K4)));
    assert!(!session.is_upscaling());
}

#[test]
fn test_upscale_failure_is_transient() {
    let (session, effects) = run(at_result(), vec![Event::UpscaleRequested(UpscaleLevel::K2)]);
    let token = upscale_token(&effects);
    let (session, _) = run(
        session,
        vec![Event::UpscaleFinished {
            token,
            result: Err(GenerationError::ApiError {
                status: 500,
                message: "boom".to_string(),
            }),
        }],
    );
    assert_eq!(session.state(), AppState::Result);
    assert_eq!(session.current_resolution(), UpscaleLevel::K1);
    assert_eq!(session.result_image(), Some(&portrait(1)));
    assert_eq!(session.error(), Some(FlowError::UpscaleFailed));

    let (session, _) = run(session, vec![Event::DismissMessage]);
    assert_eq!(session.error(), None);
    assert_eq!(session.state(), AppState::Result);
}

#[test]
fn test_export_failure_is_transient() {
    let session = at_result();
    let id = session.id();
    let (session, _) = run(
        session,
        vec![Event::ExportFinished {
            session: id,
            kind: ExportKind::Image,
            result: Err(ExportError::InvalidFilename("broken".to_string())),
        }],
    );
    assert_eq!(session.state(), AppState::Result);
    assert_eq!(session.error(), Some(FlowError::ExportFailed));
}

// === Reset ===

#[test]
fn test_reset_from_every_state_clears_session() {
    let mut sessions = vec![at_camera(), at_magic().0, at_result()];
    sessions.push(
        run(
            at_result(),
            vec![
                Event::OpenNameEntry,
                Event::NameEdited("Aino".to_string()),
                Event::CreateCertificate,
            ],
        )
        .0,
    );
    sessions.push(
        run(
            at_camera(),
            vec![Event::CameraFailed(CameraError::NoDevices)],
        )
        .0,
    );

    for session in sessions {
        let before = session.state();
        let old_id = session.id();
        let (session, effects) = run(session, vec![Event::Reset]);
        assert_eq!(session.state(), AppState::Hero, "from {:?}", before);
        assert!(session.captured_image().is_none());
        assert!(session.result_image().is_none());
        assert_eq!(session.first_name(), "");
        assert_eq!(session.error(), None);
        assert!(!session.is_processing());
        assert!(!session.is_upscaling());
        assert_ne!(session.id(), old_id);
        assert_eq!(effects, vec![Effect::ReleaseCamera]);
    }
}

#[test]
fn test_reset_keeps_language() {
    let (session, _) = run(
        at_result(),
        vec![Event::SetLanguage(Language::En), Event::Reset],
    );
    assert_eq!(session.language(), Language::En);
}

#[test]
fn test_late_generation_result_after_reset_is_discarded() {
    let (session, token) = at_magic();
    let (session, _) = run(session, vec![Event::Reset]);
    let (session, effects) = run(
        session,
        vec![Event::GenerationFinished {
            token,
            result: Ok(portrait(1)),
        }],
    );
    assert_eq!(session.state(), AppState::Hero);
    assert!(session.result_image().is_none());
    assert!(effects.is_empty());
}

#[test]
fn test_late_result_does_not_leak_into_next_visit() {
    let (session, old_token) = at_magic();
    let (session, _) = run(session, vec![Event::Reset]);
    let (session, effects) = run(
        session,
        vec![
            Event::Begin {
                credential_available: true,
            },
            Event::GroupChosen(GroupType::Single),
            Event::CaptureSucceeded(photo()),
            Event::StartGeneration,
        ],
    );
    let new_token = generate_token(&effects);
    assert_ne!(old_token, new_token);

    let (session, _) = run(
        session,
        vec![Event::GenerationFinished {
            token: old_token,
            result: Ok(portrait(7)),
        }],
    );
    assert_eq!(session.state(), AppState::Magic);
    assert!(session.is_processing());

    let (session, _) = run(
        session,
        vec![Event::GenerationFinished {
            token: new_token,
            result: Ok(portrait(8)),
        }],
    );
    assert_eq!(session.result_image(), Some(&portrait(8)));
}

// === Resolution and mutual exclusion ===

#[test]
fn test_resolution_never_moves_backward() {
    let (session, effects) = run(at_result(), vec![Event::UpscaleRequested(UpscaleLevel::K4)]);
    let token = upscale_token(&effects);
    let (session, _) = run(
        session,
        vec![Event::UpscaleFinished {
            token,
            result: Ok(portrait(4)),
        }],
    );

    for level in [UpscaleLevel::K1, UpscaleLevel::K2, UpscaleLevel::K4] {
        let (after, effects) = run(session.clone(), vec![Event::UpscaleRequested(level)]);
        assert!(effects.is_empty(), "{} accepted after 4K", level);
        assert_eq!(after.current_resolution(), UpscaleLevel::K4);
    }
}

#[test]
fn test_second_upscale_while_one_is_running_is_ignored() {
    let (session, effects) = run(at_result(), vec![Event::UpscaleRequested(UpscaleLevel::K2)]);
    assert_eq!(effects.len(), 1);

    let (session, effects) = run(session, vec![Event::UpscaleRequested(UpscaleLevel::K4)]);
    assert!(effects.is_empty());
    assert!(session.is_upscaling());
}

#[test]
fn test_certificate_waits_for_running_upscale() {
    let (session, effects) = run(at_result(), vec![Event::UpscaleRequested(UpscaleLevel::K2)]);
    let token = upscale_token(&effects);

    let (session, _) = run(session, vec![Event::OpenNameEntry]);
    assert!(!session.name_entry_open());

    let (session, effects) = run(
        session,
        vec![
            Event::NameEdited("Aino".to_string()),
            Event::CreateCertificate,
        ],
    );
    assert!(effects.is_empty());
    assert_eq!(session.state(), AppState::Result);

    let (session, _) = run(
        session,
        vec![
            Event::UpscaleFinished {
                token,
                result: Ok(portrait(2)),
            },
            Event::OpenNameEntry,
            Event::CreateCertificate,
        ],
    );
    assert_eq!(session.state(), AppState::Certificate);
    assert_eq!(session.current_resolution(), UpscaleLevel::K2);
}

#[test]
fn test_open_name_entry_is_kept_while_upscaling() {
    let (session, _) = run(
        at_result(),
        vec![
            Event::OpenNameEntry,
            Event::NameEdited("Aino".to_string()),
            Event::UpscaleRequested(UpscaleLevel::K2),
            Event::CreateCertificate,
        ],
    );
    assert!(session.is_upscaling());
    assert!(session.name_entry_open());
    assert_eq!(session.state(), AppState::Result);
}

#[test]
fn test_new_generation_resets_resolution() {
    let (session, effects) = run(at_result(), vec![Event::UpscaleRequested(UpscaleLevel::K2)]);
    let token = upscale_token(&effects);
    let (session, _) = run(
        session,
        vec![
            Event::UpscaleFinished {
                token,
                result: Ok(portrait(2)),
            },
            Event::Reset,
            Event::Begin {
                credential_available: true,
            },
            Event::GroupChosen(GroupType::Single),
        ],
    );
    assert!(session.captured_image().is_none());

    let (session, _) = run(
        session,
        vec![Event::CaptureSucceeded(photo()), Event::StartGeneration],
    );
    assert_eq!(session.current_resolution(), UpscaleLevel::K1);
}

#[test]
fn test_duplicate_start_generation_is_ignored() {
    let (session, _) = at_magic();
    let (session, effects) = run(session, vec![Event::StartGeneration]);
    assert!(effects.is_empty());
    assert_eq!(session.state(), AppState::Magic);
}

// === Downloads ===

#[test]
fn test_download_image_uses_name_and_resolution() {
    let (session, effects) = run(
        at_result(),
        vec![
            Event::OpenNameEntry,
            Event::NameEdited(" Aino ".to_string()),
            Event::DownloadImage,
        ],
    );
    assert_eq!(
        effects,
        vec![Effect::ExportImage {
            session: session.id(),
            image: portrait(1),
            name: "Aino".to_string(),
            resolution: UpscaleLevel::K1,
        }]
    );
    assert!(!session.is_downloading());
}

#[test]
fn test_certificate_download_guard() {
    let (session, effects) = run(
        at_result(),
        vec![
            Event::OpenNameEntry,
            Event::NameEdited("Aino".to_string()),
            Event::CreateCertificate,
            Event::DownloadCertificate,
        ],
    );
    assert!(session.is_downloading());
    assert!(matches!(
        effects.as_slice(),
        [Effect::ExportCertificate { name, language: Language::Fi, .. }] if name == "Aino"
    ));

    let (session, effects) = run(session, vec![Event::DownloadCertificate]);
    assert!(effects.is_empty());

    let id = session.id();
    let (session, _) = run(
        session,
        vec![Event::ExportFinished {
            session: id,
            kind: ExportKind::Certificate,
            result: Ok(PathBuf::from("/tmp/Tonttudiploma_Aino.pdf")),
        }],
    );
    assert!(!session.is_downloading());
    assert_eq!(
        session.notice(),
        Some(&Notice::Saved(PathBuf::from("/tmp/Tonttudiploma_Aino.pdf")))
    );
}

#[test]
fn test_image_export_keeps_certificate_download_running() {
    let (session, _) = run(
        at_result(),
        vec![
            Event::OpenNameEntry,
            Event::NameEdited("Aino".to_string()),
            Event::CreateCertificate,
            Event::DownloadCertificate,
            Event::DownloadImage,
        ],
    );
    assert!(session.is_downloading());

    let id = session.id();
    let (session, _) = run(
        session,
        vec![Event::ExportFinished {
            session: id,
            kind: ExportKind::Image,
            result: Ok(PathBuf::from("/tmp/Tonttu_Aino_1K.png")),
        }],
    );
    assert!(session.is_downloading());

    let (session, effects) = run(session, vec![Event::DownloadCertificate]);
    assert_eq!(effects.len(), 0);
    assert!(session.is_downloading());
}

#[test]
fn test_export_result_from_old_session_is_ignored() {
    let session = at_result();
    let old_id = session.id();
    let (session, _) = run(
        session,
        vec![
            Event::Reset,
            Event::ExportFinished {
                session: old_id,
                kind: ExportKind::Image,
                result: Ok(PathBuf::from("old.png")),
            },
        ],
    );
    assert!(session.notice().is_none());
}

// === Global events ===

#[test]
fn test_language_and_music_toggle_anywhere() {
    let (session, effects) = run(at_camera(), vec![Event::ToggleMusic]);
    assert_eq!(effects, vec![Effect::ToggleMusic]);
    assert_eq!(session.state(), AppState::Camera);

    let (session, _) = run(session, vec![Event::SetLanguage(Language::En)]);
    assert_eq!(session.language(), Language::En);
    assert_eq!(session.state(), AppState::Camera);
}

#[test]
fn test_events_outside_their_state_are_ignored() {
    let session = Session::default();
    let id = session.id();
    let (session, effects) = run(
        session,
        vec![
            Event::CaptureSucceeded(photo()),
            Event::StartGeneration,
            Event::UpscaleRequested(UpscaleLevel::K2),
            Event::DownloadCertificate,
            Event::Back,
            Event::Retry,
        ],
    );
    assert_eq!(session.state(), AppState::Hero);
    assert_eq!(session.id(), id);
    assert!(session.captured_image().is_none());
    assert!(effects.is_empty());
}
