//! Background music handle.
//!
//! The booth owns exactly one [`BackgroundAudio`]. It is created at startup,
//! started when the camera screen is first entered and stopped on shutdown.

/// Output for the looping background track.
pub trait AudioSink: Send {
    /// Start or resume playback. Failures are the sink's business; music is optional.
    fn play(&mut self);
    fn pause(&mut self);
    /// Stop playback for good and free the device.
    fn stop(&mut self);
}

/// A sink that only logs track changes; it makes no sound.
///
/// No playback backend ships with the booth. Hosts that want real music
/// implement [`AudioSink`] themselves.
#[derive(Debug, Default)]
pub struct LogSink {
    track: String,
}

impl LogSink {
    pub fn new(track: impl Into<String>) -> Self {
        Self {
            track: track.into(),
        }
    }
}

impl AudioSink for LogSink {
    fn play(&mut self) {
        log::info!("Music playing: {}", self.track);
    }

    fn pause(&mut self) {
        log::info!("Music paused");
    }

    fn stop(&mut self) {
        log::debug!("Music stopped");
    }
}

pub struct BackgroundAudio {
    sink: Option<Box<dyn AudioSink>>,
    playing: bool,
}

impl BackgroundAudio {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink: Some(sink),
            playing: false,
        }
    }

    /// A handle that never plays anything.
    pub fn disabled() -> Self {
        Self {
            sink: None,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start playback if it is not already running.
    pub fn ensure_playing(&mut self) {
        if self.playing {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.play();
            self.playing = true;
        }
    }

    /// Flip between playing and paused. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            if let Some(sink) = self.sink.as_mut() {
                sink.pause();
            }
            self.playing = false;
        } else {
            self.ensure_playing();
        }
        self.playing
    }

    /// Stop and release the output. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            sink.stop();
        }
        self.playing = false;
    }
}

impl std::fmt::Debug for BackgroundAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundAudio")
            .field("enabled", &self.sink.is_some())
            .field("playing", &self.playing)
            .finish()
    }
}

impl Drop for BackgroundAudio {
    fn drop(&mut self) {
        self.shutdown();
    }
}
