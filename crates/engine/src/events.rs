//! Change notification for editor sessions.
//!
//! One event type, no payload: collaborators re-query session state when
//! they receive it. Observers are registered on the session, which keeps
//! ownership one-directional (session owns document, history and overlay;
//! nothing points back).

/// Emitted after every successful mutation of header or row content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    DocumentChanged,
}

/// Callback type for receiving session events.
pub type EventCallback = Box<dyn FnMut(SessionEvent)>;
