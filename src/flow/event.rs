//! Inputs and outputs of the flow transition.

use std::path::PathBuf;

use super::session::{RequestToken, SessionId};
use crate::camera::CameraError;
use crate::export::ExportError;
use crate::generation::{ElfStyle, GenerationError, GroupType, UpscaleLevel};
use crate::i18n::Language;
use crate::media::EncodedImage;

/// What the user asked for. Sent by the presentation layer to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Begin,
    SelectCredential,
    ChooseGroup(GroupType),
    Capture,
    ChooseStyle(ElfStyle),
    StartMagic,
    Upscale(UpscaleLevel),
    OpenNameEntry,
    EditName(String),
    CancelNameEntry,
    CreateCertificate,
    Back,
    DownloadImage,
    DownloadCertificate,
    SetLanguage(Language),
    ToggleMusic,
    DismissMessage,
    Reset,
    Retry,
}

/// Which download an export result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Image,
    Certificate,
}

/// Everything the transition function reacts to: user intents after the
/// driver has resolved host queries, plus results of effects.
#[derive(Debug)]
pub enum Event {
    Begin { credential_available: bool },
    CredentialSelected,
    GroupChosen(GroupType),
    CameraFailed(CameraError),
    CaptureRequested,
    CaptureSucceeded(EncodedImage),
    CaptureFailed(CameraError),
    StyleChosen(ElfStyle),
    StartGeneration,
    GenerationFinished {
        token: RequestToken,
        result: Result<EncodedImage, GenerationError>,
    },
    UpscaleRequested(UpscaleLevel),
    UpscaleFinished {
        token: RequestToken,
        result: Result<EncodedImage, GenerationError>,
    },
    OpenNameEntry,
    NameEdited(String),
    CancelNameEntry,
    CreateCertificate,
    Back,
    DownloadImage,
    DownloadCertificate,
    ExportFinished {
        session: SessionId,
        kind: ExportKind,
        result: Result<PathBuf, ExportError>,
    },
    SetLanguage(Language),
    ToggleMusic,
    DismissMessage,
    Reset,
    Retry,
}

/// Side effects requested by a transition, executed by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    AcquireCamera,
    FreezeFrame,
    ReleaseCamera,
    StartMusic,
    ToggleMusic,
    Generate {
        token: RequestToken,
        image: EncodedImage,
        style: ElfStyle,
        group: GroupType,
    },
    Upscale {
        token: RequestToken,
        image: EncodedImage,
        style: ElfStyle,
        level: UpscaleLevel,
    },
    ExportImage {
        session: SessionId,
        image: EncodedImage,
        name: String,
        resolution: UpscaleLevel,
    },
    ExportCertificate {
        session: SessionId,
        image: EncodedImage,
        name: String,
        language: Language,
    },
}
