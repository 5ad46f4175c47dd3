//! Async driver around the pure transition.
//!
//! The driver owns the session and every resource the flow touches: the
//! camera stream, the music handle and the service clients. Presentation code
//! sends [`Intent`]s in and reads the [`Session`] back; long-running work runs
//! on spawned tasks whose results come back as [`Completion`]s.

use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::event::{Effect, Event, ExportKind, Intent};
use super::session::{AppState, Session, SessionId};
use super::transition::transition;
use crate::audio::BackgroundAudio;
use crate::camera::{CameraError, CameraStream, CaptureService, FacingMode};
use crate::credentials::CredentialProvider;
use crate::export::{
    certificate_filename, image_filename, Certificate, ExportError, Exporter, DEFAULT_SUBJECT,
};
use crate::generation::{GenerationClient, GenerationError};
use crate::i18n::Language;
use crate::media::EncodedImage;

/// Services the driver talks to.
pub struct Collaborators {
    pub generator: Arc<dyn GenerationClient>,
    pub capture: CaptureService,
    pub exporter: Arc<dyn Exporter>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub audio: BackgroundAudio,
}

#[derive(Debug, Clone)]
pub struct DriverSettings {
    pub facing: FacingMode,
    /// Word used in download file names
    pub subject: String,
    pub language: Language,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            facing: FacingMode::User,
            subject: DEFAULT_SUBJECT.to_string(),
            language: Language::default(),
        }
    }
}

/// Result of background work, to be handed back to [`FlowDriver::complete`].
#[derive(Debug)]
pub struct Completion(Event);

impl Completion {
    pub fn event(&self) -> &Event {
        &self.0
    }
}

/// Receiving end for background results.
#[derive(Debug)]
pub struct Completions {
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Completions {
    pub async fn next(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }
}

pub struct FlowDriver {
    session: Session,
    settings: DriverSettings,
    generator: Arc<dyn GenerationClient>,
    capture: CaptureService,
    exporter: Arc<dyn Exporter>,
    credentials: Arc<dyn CredentialProvider>,
    audio: BackgroundAudio,
    stream: Option<CameraStream>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    in_flight: usize,
}

impl FlowDriver {
    pub fn new(collaborators: Collaborators, settings: DriverSettings) -> (Self, Completions) {
        let (completions_tx, rx) = mpsc::unbounded_channel();
        let driver = Self {
            session: Session::new(settings.language),
            settings,
            generator: collaborators.generator,
            capture: collaborators.capture,
            exporter: collaborators.exporter,
            credentials: collaborators.credentials,
            audio: collaborators.audio,
            stream: None,
            completions_tx,
            in_flight: 0,
        };
        (driver, Completions { rx })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// A camera stream is currently held.
    pub fn camera_active(&self) -> bool {
        self.stream.as_ref().is_some_and(CameraStream::is_active)
    }

    pub fn music_playing(&self) -> bool {
        self.audio.is_playing()
    }

    /// Number of spawned tasks whose results have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply a user intent.
    pub fn handle(&mut self, intent: Intent) {
        let event = match intent {
            Intent::Begin => Event::Begin {
                credential_available: self.credentials.has_credential(),
            },
            Intent::SelectCredential => {
                if self.session.state() == AppState::KeyGate {
                    self.credentials.open_picker();
                }
                Event::CredentialSelected
            }
            Intent::ChooseGroup(group) => Event::GroupChosen(group),
            Intent::Capture => Event::CaptureRequested,
            Intent::ChooseStyle(style) => Event::StyleChosen(style),
            Intent::StartMagic => Event::StartGeneration,
            Intent::Upscale(level) => Event::UpscaleRequested(level),
            Intent::OpenNameEntry => Event::OpenNameEntry,
            Intent::EditName(name) => Event::NameEdited(name),
            Intent::CancelNameEntry => Event::CancelNameEntry,
            Intent::CreateCertificate => Event::CreateCertificate,
            Intent::Back => Event::Back,
            Intent::DownloadImage => Event::DownloadImage,
            Intent::DownloadCertificate => Event::DownloadCertificate,
            Intent::SetLanguage(language) => Event::SetLanguage(language),
            Intent::ToggleMusic => Event::ToggleMusic,
            Intent::DismissMessage => Event::DismissMessage,
            Intent::Reset => Event::Reset,
            Intent::Retry => Event::Retry,
        };
        self.dispatch(event);
    }

    /// Apply the result of background work.
    pub fn complete(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.dispatch(completion.0);
    }

    /// Wait until every spawned task has reported back.
    pub async fn settle(&mut self, completions: &mut Completions) {
        while self.in_flight > 0 {
            match completions.next().await {
                Some(completion) => self.complete(completion),
                None => break,
            }
        }
    }

    /// Release the camera and stop the music.
    pub fn shutdown(&mut self) {
        self.release_camera();
        self.audio.shutdown();
    }

    fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let before = self.session.state();
            let session = std::mem::take(&mut self.session);
            let (session, effects) = transition(session, event);
            self.session = session;
            if before != self.session.state() {
                log::info!("{:?} -> {:?}", before, self.session.state());
            }
            for effect in effects {
                self.execute(effect, &mut queue);
            }
        }
        if self.session.state() != AppState::Camera {
            self.release_camera();
        }
    }

    fn execute(&mut self, effect: Effect, follow_ups: &mut VecDeque<Event>) {
        match effect {
            Effect::AcquireCamera => {
                self.release_camera();
                match self.capture.acquire(self.settings.facing) {
                    Ok(stream) => self.stream = Some(stream),
                    Err(err) => follow_ups.push_back(Event::CameraFailed(err)),
                }
            }
            Effect::FreezeFrame => {
                let result = match self.stream.as_mut() {
                    Some(stream) => self.capture.freeze(stream),
                    None => Err(CameraError::Released),
                };
                follow_ups.push_back(match result {
                    Ok(image) => Event::CaptureSucceeded(image),
                    Err(err) => Event::CaptureFailed(err),
                });
            }
            Effect::ReleaseCamera => self.release_camera(),
            Effect::StartMusic => self.audio.ensure_playing(),
            Effect::ToggleMusic => {
                self.audio.toggle();
            }
            Effect::Generate {
                token,
                image,
                style,
                group,
            } => {
                let client = Arc::clone(&self.generator);
                self.spawn_request(
                    async move { client.transform(&image, style, group).await },
                    move |result| Event::GenerationFinished { token, result },
                );
            }
            Effect::Upscale {
                token,
                image,
                style,
                level,
            } => {
                let client = Arc::clone(&self.generator);
                self.spawn_request(
                    async move { client.upscale(&image, style, level).await },
                    move |result| Event::UpscaleFinished { token, result },
                );
            }
            Effect::ExportImage {
                session,
                image,
                name,
                resolution,
            } => {
                let filename = image_filename(&self.settings.subject, &name, resolution);
                self.spawn_export(session, ExportKind::Image, move |exporter| {
                    exporter.export_image(&image, &filename)
                });
            }
            Effect::ExportCertificate {
                session,
                image,
                name,
                language,
            } => {
                let filename = certificate_filename(&self.settings.subject, &name);
                let certificate = Certificate::new(name, image, language);
                self.spawn_export(session, ExportKind::Certificate, move |exporter| {
                    exporter.export_document(&certificate, &filename)
                });
            }
        }
    }

    /// Run a generation call on its own task and report its result.
    ///
    /// The inner task is awaited through its join handle so a panic still
    /// produces a completion and the pending request is cleared.
    fn spawn_request<F, M>(&mut self, work: F, finish: M)
    where
        F: Future<Output = Result<EncodedImage, GenerationError>> + Send + 'static,
        M: FnOnce(Result<EncodedImage, GenerationError>) -> Event + Send + 'static,
    {
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = match tokio::spawn(work).await {
                Ok(result) => result,
                Err(err) => Err(GenerationError::TaskFailed(err.to_string())),
            };
            // Receiver gone means the booth is shutting down
            let _ = tx.send(Completion(finish(result)));
        });
    }

    fn spawn_export<J>(&mut self, session: SessionId, kind: ExportKind, job: J)
    where
        J: FnOnce(&dyn Exporter) -> Result<PathBuf, ExportError> + Send + 'static,
    {
        let exporter = Arc::clone(&self.exporter);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = match tokio::task::spawn_blocking(move || job(exporter.as_ref())).await {
                Ok(result) => result,
                Err(err) => Err(ExportError::TaskFailed(err.to_string())),
            };
            let _ = tx.send(Completion(Event::ExportFinished {
                session,
                kind,
                result,
            }));
        });
    }

    fn release_camera(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            self.capture.release(&mut stream);
            log::debug!("Camera released");
        }
    }
}

impl Drop for FlowDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
