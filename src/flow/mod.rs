//! Booth flow controller.
//!
//! - [`transition`]: pure state machine over [`Session`]
//! - [`FlowDriver`]: executes effects, owns the camera stream and music

mod driver;
mod event;
mod session;
mod transition;

pub use driver::{Collaborators, Completion, Completions, DriverSettings, FlowDriver};
pub use event::{Effect, Event, ExportKind, Intent};
pub use session::{AppState, FlowError, Notice, RequestKind, RequestToken, Session, SessionId};
pub use transition::transition;
