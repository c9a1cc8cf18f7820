//! Single-slot dialog broker.
//!
//! At most one dialog is visible system-wide: the broker is a two-state
//! machine (Idle / Open) with a single pending-completion slot. Opening a
//! dialog while another is open REPLACES it outright — there is no queue
//! and no stack. The replaced caller's pending result is intentionally
//! orphaned: its resolver is parked (not dropped) so the future never
//! resolves. Callers must not assume every `open` eventually settles.
//!
//! The broker knows nothing about rendering; content is an opaque tagged
//! value (a builtin kind or a caller-supplied view) that the host
//! materializes. See [`host`].

pub mod host;

use std::cell::Cell;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use serde_json::{Map, Value};
use tokio::sync::oneshot;

/// Opaque caller-supplied payload passed through to the rendered content.
pub type DialogData = Map<String, Value>;

/// Generic result value a dialog closes with. Builtin dialogs use
/// `Bool(true)` / `Bool(false)`; chrome closes (backdrop, Esc on a custom
/// view) use `Null`.
pub type DialogResult = Value;

// ============================================================================
// Content
// ============================================================================

/// Builtin dialog bodies for generic messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    Success,
    Error,
    Warning,
    Confirm,
}

impl BuiltinKind {
    pub fn default_title(&self) -> &'static str {
        match self {
            BuiltinKind::Success => "Success",
            BuiltinKind::Error => "Error",
            BuiltinKind::Warning => "Warning",
            BuiltinKind::Confirm => "Confirm",
        }
    }
}

/// A caller-supplied renderable unit.
pub trait DialogView: fmt::Debug + Send {
    fn render(&self, frame: &mut Frame, area: Rect, data: &DialogData);

    /// Handles a key while this view is the open dialog.
    fn handle_key(&mut self, key: KeyEvent, data: &DialogData) -> DialogTransition;
}

/// Transition returned by a custom view's key handler.
#[derive(Debug)]
pub enum DialogTransition {
    Stay,
    Close(DialogResult),
}

/// Dialog content: a builtin kind or a custom view, dispatched by tag.
#[derive(Debug)]
pub enum DialogContent {
    Builtin(BuiltinKind),
    View(Box<dyn DialogView>),
}

// ============================================================================
// DialogRequest
// ============================================================================

/// Description of one pending dialog: content plus display hints.
#[derive(Debug)]
pub struct DialogRequest {
    pub content: DialogContent,
    pub title: Option<String>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    /// A mouse click outside the dialog closes it (with `Null`).
    pub close_on_backdrop_click: bool,
    /// Show the close affordance in the dialog chrome.
    pub show_close_button: bool,
    /// Opaque values handed to the rendered content.
    pub data: DialogData,
}

impl DialogRequest {
    pub fn new(content: DialogContent) -> Self {
        Self {
            content,
            title: None,
            width: None,
            height: None,
            close_on_backdrop_click: true,
            show_close_button: true,
            data: DialogData::new(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(DialogContent::Builtin(BuiltinKind::Success)).with_message(message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DialogContent::Builtin(BuiltinKind::Error)).with_message(message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DialogContent::Builtin(BuiltinKind::Warning)).with_message(message)
    }

    pub fn confirm(message: impl Into<String>) -> Self {
        Self::new(DialogContent::Builtin(BuiltinKind::Confirm)).with_message(message)
    }

    pub fn view(view: Box<dyn DialogView>) -> Self {
        Self::new(DialogContent::View(view))
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.data
            .insert("message".to_string(), Value::String(message.into()));
        self
    }

    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn backdrop_close(mut self, enabled: bool) -> Self {
        self.close_on_backdrop_click = enabled;
        self
    }

    #[must_use]
    pub fn close_button(mut self, enabled: bool) -> Self {
        self.show_close_button = enabled;
        self
    }

    /// Convenience accessor for the conventional message payload.
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}

// ============================================================================
// Broker
// ============================================================================

/// Identifier for one `open` call; lets a handle target its own dialog.
pub type DialogId = u64;

/// Handle returned by [`DialogBroker::open`].
#[derive(Debug)]
pub struct DialogHandle {
    pub id: DialogId,
    result: oneshot::Receiver<DialogResult>,
}

impl DialogHandle {
    /// Resolves when the dialog created by this open call is closed.
    ///
    /// Never resolves if the dialog was replaced by a later `open`; returns
    /// None only when the broker itself was torn down.
    pub async fn wait(self) -> Option<DialogResult> {
        self.result.await.ok()
    }

    /// Non-blocking probe for the result.
    pub fn try_result(&mut self) -> Option<DialogResult> {
        self.result.try_recv().ok()
    }

    /// True while the result has neither arrived nor been abandoned by
    /// broker teardown.
    pub fn is_pending(&mut self) -> bool {
        matches!(
            self.result.try_recv(),
            Err(oneshot::error::TryRecvError::Empty)
        )
    }
}

#[derive(Debug)]
struct ActiveDialog {
    id: DialogId,
    request: DialogRequest,
    resolver: oneshot::Sender<DialogResult>,
}

/// A dialog that just closed, handed back to the reducer so the page that
/// opened it can react.
#[derive(Debug)]
pub struct ClosedDialog {
    pub id: DialogId,
    pub request: DialogRequest,
    pub result: DialogResult,
}

/// The single-slot broker. Exactly one exists per running console.
#[derive(Debug, Default)]
pub struct DialogBroker {
    slot: Option<ActiveDialog>,
    next_id: DialogId,
    /// Resolvers of replaced dialogs. Kept alive so the orphaned futures
    /// stay pending forever instead of erroring.
    parked: Vec<oneshot::Sender<DialogResult>>,
    /// Rect the host last drew the dialog into; used for backdrop
    /// hit-testing. Written during render through a shared reference.
    area: Cell<Rect>,
}

impl DialogBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.slot.is_some()
    }

    /// Returns the currently requested dialog, if any.
    pub fn current(&self) -> Option<&DialogRequest> {
        self.slot.as_ref().map(|active| &active.request)
    }

    /// Opens a dialog, replacing any dialog already open.
    ///
    /// The replaced request is discarded and its pending result orphaned.
    pub fn open(&mut self, request: DialogRequest) -> DialogHandle {
        if let Some(previous) = self.slot.take() {
            tracing::debug!(id = previous.id, "dialog replaced before closing");
            self.parked.push(previous.resolver);
        }

        self.next_id += 1;
        let id = self.next_id;
        let (resolver, result) = oneshot::channel();
        self.slot = Some(ActiveDialog {
            id,
            request,
            resolver,
        });
        DialogHandle { id, result }
    }

    /// Closes the open dialog, resolving exactly its pending future with
    /// `result`. No-op (returns None) when already idle.
    pub fn close(&mut self, result: DialogResult) -> Option<ClosedDialog> {
        let active = self.slot.take()?;
        self.area.set(Rect::default());
        // The opener may have dropped its handle; that is fine.
        let _ = active.resolver.send(result.clone());
        Some(ClosedDialog {
            id: active.id,
            request: active.request,
            result,
        })
    }

    /// Programmatic close for a specific open call. No-op unless `id`
    /// names the dialog that is currently open.
    pub fn close_dialog(&mut self, id: DialogId, result: DialogResult) -> Option<ClosedDialog> {
        if self.slot.as_ref().is_some_and(|active| active.id == id) {
            self.close(result)
        } else {
            None
        }
    }

    /// Routes a key to the open dialog.
    ///
    /// Builtin dialogs confirm with Enter/`y` (`true`) and cancel with
    /// Esc/`n` (`false`). Custom views get the key; Esc closes them with
    /// `Null` when the close affordance is enabled.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ClosedDialog> {
        let transition = {
            let active = self.slot.as_mut()?;
            let DialogRequest {
                content,
                data,
                show_close_button,
                ..
            } = &mut active.request;

            match content {
                DialogContent::Builtin(_) => match key.code {
                    KeyCode::Enter | KeyCode::Char('y') => {
                        DialogTransition::Close(Value::Bool(true))
                    }
                    KeyCode::Esc | KeyCode::Char('n') => {
                        DialogTransition::Close(Value::Bool(false))
                    }
                    _ => DialogTransition::Stay,
                },
                DialogContent::View(view) => {
                    if key.code == KeyCode::Esc && *show_close_button {
                        DialogTransition::Close(Value::Null)
                    } else {
                        view.handle_key(key, &*data)
                    }
                }
            }
        };

        match transition {
            DialogTransition::Stay => None,
            DialogTransition::Close(result) => self.close(result),
        }
    }

    /// Routes a mouse click. A click outside the dialog rect closes with
    /// `Null` iff the request allows backdrop closing.
    pub fn handle_click(&mut self, column: u16, row: u16) -> Option<ClosedDialog> {
        if !self.current()?.close_on_backdrop_click {
            return None;
        }
        let area = self.area.get();
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if inside { None } else { self.close(Value::Null) }
    }

    pub(crate) fn set_area(&self, area: Rect) {
        self.area.set(area);
    }
}
