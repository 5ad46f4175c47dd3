//! The Session: everything the booth knows about one visit.

use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use crate::generation::{AuthFailure, ElfStyle, GroupType, UpscaleLevel};
use crate::i18n::Language;
use crate::media::EncodedImage;

/// Screens of the booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    KeyGate,
    #[default]
    Hero,
    GroupSelect,
    Camera,
    StyleSelect,
    Magic,
    Result,
    Certificate,
    Error,
}

impl AppState {
    /// States in which a result image must be present.
    pub fn shows_result(self) -> bool {
        matches!(self, AppState::Result | AppState::Certificate)
    }
}

/// Identity of one visit. A reset starts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one outstanding generation or upscale request.
///
/// A completion is applied only if its token is the one the current session
/// is waiting for; anything else is a late answer to an abandoned request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub session: SessionId,
    pub seq: u64,
}

/// What an outstanding request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Generation,
    Upscale(UpscaleLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PendingRequest {
    pub(super) token: RequestToken,
    pub(super) kind: RequestKind,
}

/// Classified failures shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("no credential selected")]
    CredentialMissing,
    #[error("credential rejected ({0:?})")]
    CredentialInvalid(AuthFailure),
    #[error("camera unavailable")]
    CameraUnavailable,
    #[error("generation failed")]
    GenerationFailed,
    #[error("upscale failed")]
    UpscaleFailed,
    #[error("export failed")]
    ExportFailed,
}

impl FlowError {
    /// Localized text for this error.
    pub fn message(self, language: Language) -> &'static str {
        let t = language.strings();
        match self {
            FlowError::CredentialMissing => t.credential_missing,
            FlowError::CredentialInvalid(AuthFailure::PermissionDenied) => t.credential_permission,
            FlowError::CredentialInvalid(AuthFailure::MissingKey) => t.credential_missing,
            FlowError::CredentialInvalid(_) => t.credential_not_found,
            FlowError::CameraUnavailable => t.camera_unavailable,
            FlowError::GenerationFailed => t.generation_failed,
            FlowError::UpscaleFailed => t.upscale_failed,
            FlowError::ExportFailed => t.export_failed,
        }
    }

    /// Non-fatal errors are shown as a transient message; the screen stays.
    pub fn is_transient(self) -> bool {
        matches!(self, FlowError::UpscaleFailed | FlowError::ExportFailed)
    }
}

/// Positive transient messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Upscaled(UpscaleLevel),
    Saved(PathBuf),
}

impl Notice {
    pub fn message(&self, language: Language) -> String {
        let t = language.strings();
        match self {
            Notice::Upscaled(level) => format!("{} ({})", t.upscale_success, level),
            Notice::Saved(path) => format!("{}: {}", t.saved, path.display()),
        }
    }
}

/// One user's progress through the booth.
///
/// Only the flow module mutates a session; everything else reads it through
/// the accessors.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub(super) id: SessionId,
    pub(super) state: AppState,
    pub(super) language: Language,
    pub(super) first_name: String,
    pub(super) name_entry_open: bool,
    pub(super) captured_image: Option<EncodedImage>,
    pub(super) result_image: Option<EncodedImage>,
    pub(super) selected_style: ElfStyle,
    pub(super) group_type: GroupType,
    pub(super) current_resolution: UpscaleLevel,
    pub(super) error: Option<FlowError>,
    pub(super) notice: Option<Notice>,
    pub(super) pending: Option<PendingRequest>,
    pub(super) is_downloading: bool,
    pub(super) next_seq: u64,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn name_entry_open(&self) -> bool {
        self.name_entry_open
    }

    pub fn captured_image(&self) -> Option<&EncodedImage> {
        self.captured_image.as_ref()
    }

    pub fn result_image(&self) -> Option<&EncodedImage> {
        self.result_image.as_ref()
    }

    pub fn selected_style(&self) -> ElfStyle {
        self.selected_style
    }

    pub fn group_type(&self) -> GroupType {
        self.group_type
    }

    pub fn current_resolution(&self) -> UpscaleLevel {
        self.current_resolution
    }

    pub fn error(&self) -> Option<FlowError> {
        self.error
    }

    /// Localized text of the current error, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(|e| e.message(self.language))
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// A generation request is in flight.
    pub fn is_processing(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingRequest {
                kind: RequestKind::Generation,
                ..
            })
        )
    }

    /// An upscale request is in flight.
    pub fn is_upscaling(&self) -> bool {
        matches!(
            self.pending,
            Some(PendingRequest {
                kind: RequestKind::Upscale(_),
                ..
            })
        )
    }

    pub fn is_downloading(&self) -> bool {
        self.is_downloading
    }

    /// Token of the request the session is waiting for.
    pub fn pending_token(&self) -> Option<RequestToken> {
        self.pending.map(|p| p.token)
    }

    /// The certificate can be created from the name entry, and no
    /// upscale is running.
    pub fn can_create_certificate(&self) -> bool {
        self.state == AppState::Result
            && self.pending.is_none()
            && self.name_entry_open
            && !self.first_name.trim().is_empty()
    }

    /// Check the structural invariants; returns the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.result_image.is_some() != self.state.shows_result() {
            return Err(format!(
                "result image present={} in state {:?}",
                self.result_image.is_some(),
                self.state
            ));
        }
        match self.pending.map(|p| p.kind) {
            Some(RequestKind::Generation) if self.state != AppState::Magic => {
                Err(format!("generation pending in state {:?}", self.state))
            }
            Some(RequestKind::Upscale(_)) if !self.state.shows_result() => {
                Err(format!("upscale pending in state {:?}", self.state))
            }
            Some(kind) if self.pending.is_some_and(|p| p.token.session != self.id) => {
                Err(format!("{:?} pending for another session", kind))
            }
            _ => Ok(()),
        }
    }

    /// Clear the visit and start over at the hero screen.
    ///
    /// The language choice survives; everything else, including the
    /// session identity, is replaced.
    pub(super) fn reset(&mut self) {
        *self = Session::new(self.language);
    }

    /// Issue a new token for this session.
    pub(super) fn issue(&mut self, kind: RequestKind) -> RequestToken {
        self.next_seq += 1;
        let token = RequestToken {
            session: self.id,
            seq: self.next_seq,
        };
        self.pending = Some(PendingRequest { token, kind });
        token
    }

    /// Clear the pending generation if `token` is the one being waited for.
    pub(super) fn settle_generation(&mut self, token: RequestToken) -> bool {
        self.settle(token, |kind| kind == RequestKind::Generation)
            .is_some()
    }

    /// Clear the pending upscale if `token` is the one being waited for.
    pub(super) fn settle_upscale(&mut self, token: RequestToken) -> Option<UpscaleLevel> {
        match self.settle(token, |kind| matches!(kind, RequestKind::Upscale(_))) {
            Some(RequestKind::Upscale(level)) => Some(level),
            _ => None,
        }
    }

    fn settle(
        &mut self,
        token: RequestToken,
        expected: impl Fn(RequestKind) -> bool,
    ) -> Option<RequestKind> {
        match self.pending {
            Some(pending) if pending.token == token && expected(pending.kind) => {
                self.pending = None;
                Some(pending.kind)
            }
            _ => None,
        }
    }
}
