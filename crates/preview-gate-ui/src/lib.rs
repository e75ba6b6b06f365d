#![warn(missing_docs)]
//! # preview-gate-ui
//!
//! ## Purpose
//! Defines the single `FileUploadPreview` component: a session gate followed by
//! an upload/preview widget.
//!
//! ## Responsibilities
//! - Hold all component state in one tagged union so impossible combinations
//!   (uploading without a file, a widget before login) cannot be represented.
//! - Reduce user events (typing, submit, file pick, upload) into transitions.
//! - Drop preview derivations that finish after a newer file was picked.
//! - Render the current state into a declarative [`View`].
//!
//! ## Data flow
//! Event handlers call reducers on [`FileUploadPreview`]. Reducers that start
//! asynchronous work hand back a job value ([`PreviewJob`], [`UploadTicket`]);
//! the orchestrator runs the work and feeds the result back in.
//!
//! ## Ownership and lifetimes
//! The component owns every value it renders. Jobs carry cloned file handles,
//! so running work never borrows component state.
//!
//! ## Error model
//! Out-of-place events are mostly no-ops reported through return values.
//! [`UiError`] covers events that cannot apply to the current screen.
//!
//! ## Security and privacy notes
//! The secret is masked in rendered views and never logged.

mod view;

use preview_gate_auth::{AuthError, Credentials, Session, SessionGate};
use preview_gate_core::{MediaKind, ObjectUrl, PreviewRepresentation, SelectedFile};
use thiserror::Error;

pub use view::{
    Action, FALLBACK_PREVIEW_TEXT, Node, UPLOADING_NOTICE_TEXT, View, render_preview,
};

/// Identity of one file pick. Strictly increasing per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u64);

/// Blocking user-visible alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Alert text.
    pub message: String,
}

/// File currently selected in the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentFile {
    /// Pick identity used to reject stale previews.
    pub id: FileId,
    /// Picked file.
    pub file: SelectedFile,
    /// Derived preview, once available.
    pub preview: Option<PreviewRepresentation>,
}

/// Upload widget lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetPhase {
    /// No file selected.
    Idle,
    /// File selected, upload available.
    Ready(CurrentFile),
    /// Upload/process sequence in flight.
    Uploading(CurrentFile),
}

impl WidgetPhase {
    fn current(&self) -> Option<&CurrentFile> {
        match self {
            Self::Idle => None,
            Self::Ready(current) | Self::Uploading(current) => Some(current),
        }
    }

    fn current_mut(&mut self) -> Option<&mut CurrentFile> {
        match self {
            Self::Idle => None,
            Self::Ready(current) | Self::Uploading(current) => Some(current),
        }
    }
}

/// Credential form shown before login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Values typed so far.
    pub credentials: Credentials,
    /// Alert raised by the last rejected submit, until dismissed.
    pub alert: Option<Alert>,
}

/// Widget shown after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadWidget {
    /// Session that unlocked the widget.
    pub session: Session,
    /// Selection/upload phase.
    pub phase: WidgetPhase,
    /// Reference to the most recent processed image.
    pub processed: Option<ObjectUrl>,
    next_file_id: u64,
}

impl UploadWidget {
    fn new(session: Session) -> Self {
        Self {
            session,
            phase: WidgetPhase::Idle,
            processed: None,
            next_file_id: 0,
        }
    }

    fn issue_file_id(&mut self) -> FileId {
        self.next_file_id += 1;
        FileId(self.next_file_id)
    }
}

/// Whole component state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentState {
    /// Session gate is showing.
    LoggedOut(LoginForm),
    /// Upload widget is showing. Never reverts.
    LoggedIn(UploadWidget),
}

/// Result of a credential submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched; the widget is now showing.
    Authenticated,
    /// Credentials did not match; one alert was raised.
    Rejected(Alert),
    /// Submit arrived after login and was ignored.
    AlreadyLoggedIn,
}

/// Preview derivation requested by a file pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewJob {
    /// Pick identity to hand back to [`FileUploadPreview::apply_preview`].
    pub file_id: FileId,
    /// File whose content should be encoded.
    pub file: SelectedFile,
}

impl PreviewJob {
    /// Runs the derivation synchronously.
    pub fn derive(&self) -> PreviewRepresentation {
        PreviewRepresentation::from_file(&self.file)
    }
}

/// Proof that an upload was started; consumed on completion.
#[derive(Debug, PartialEq, Eq)]
pub struct UploadTicket {
    /// Pick identity of the file being uploaded.
    pub file_id: FileId,
    /// File snapshot sent to the processing endpoint.
    pub file: SelectedFile,
}

/// The login-gated file upload and preview component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadPreview {
    state: ComponentState,
}

impl FileUploadPreview {
    /// Creates the component in the logged-out state with empty fields.
    pub fn new() -> Self {
        Self {
            state: ComponentState::LoggedOut(LoginForm::default()),
        }
    }

    /// Returns the state snapshot.
    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    /// Updates the identifier field. Ignored after login.
    pub fn set_identifier(&mut self, value: impl Into<String>) -> bool {
        match &mut self.state {
            ComponentState::LoggedOut(form) => {
                form.credentials.identifier = value.into();
                true
            }
            ComponentState::LoggedIn(_) => false,
        }
    }

    /// Updates the secret field. Ignored after login.
    pub fn set_secret(&mut self, value: impl Into<String>) -> bool {
        match &mut self.state {
            ComponentState::LoggedOut(form) => {
                form.credentials.secret = value.into();
                true
            }
            ComponentState::LoggedIn(_) => false,
        }
    }

    /// Submits the typed credentials to `gate`.
    ///
    /// On a match the form is discarded and the widget starts in `Idle`.
    /// On a mismatch the typed values stay and one alert is raised.
    pub fn submit_login(&mut self, gate: &SessionGate) -> LoginOutcome {
        let ComponentState::LoggedOut(form) = &mut self.state else {
            return LoginOutcome::AlreadyLoggedIn;
        };

        match gate.submit(&form.credentials) {
            Ok(session) => {
                self.state = ComponentState::LoggedIn(UploadWidget::new(session));
                LoginOutcome::Authenticated
            }
            Err(error @ AuthError::InvalidCredentials) => {
                let alert = Alert {
                    message: error.to_string(),
                };
                form.alert = Some(alert.clone());
                LoginOutcome::Rejected(alert)
            }
        }
    }

    /// Clears the pending alert and returns it.
    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        match &mut self.state {
            ComponentState::LoggedOut(form) => form.alert.take(),
            ComponentState::LoggedIn(_) => None,
        }
    }

    /// Returns the pending alert, if any.
    pub fn pending_alert(&self) -> Option<&Alert> {
        match &self.state {
            ComponentState::LoggedOut(form) => form.alert.as_ref(),
            ComponentState::LoggedIn(_) => None,
        }
    }

    /// Returns `true` once the gate has been passed.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, ComponentState::LoggedIn(_))
    }

    /// Replaces the selected file and requests a preview for it.
    ///
    /// The previous preview is cleared immediately. An upload already in
    /// flight keeps running; the widget stays in `Uploading` with the new file.
    ///
    /// # Errors
    /// Returns [`UiError::NotAuthenticated`] while the gate is showing.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<PreviewJob, UiError> {
        let widget = self.widget_mut()?;
        let id = widget.issue_file_id();
        let current = CurrentFile {
            id,
            file: file.clone(),
            preview: None,
        };

        tracing::info!(
            file = %file.name,
            media_type = %file.media_type,
            size = file.len(),
            fingerprint = %file.fingerprint(),
            "file selected"
        );

        widget.phase = match widget.phase {
            WidgetPhase::Uploading(_) => WidgetPhase::Uploading(current),
            WidgetPhase::Idle | WidgetPhase::Ready(_) => WidgetPhase::Ready(current),
        };

        Ok(PreviewJob { file_id: id, file })
    }

    /// Drops the selected file and its preview.
    ///
    /// # Errors
    /// Returns [`UiError::NotAuthenticated`] while the gate is showing and
    /// [`UiError::UploadInProgress`] while an upload is in flight.
    pub fn clear_selection(&mut self) -> Result<(), UiError> {
        let widget = self.widget_mut()?;
        if matches!(widget.phase, WidgetPhase::Uploading(_)) {
            return Err(UiError::UploadInProgress);
        }
        widget.phase = WidgetPhase::Idle;
        Ok(())
    }

    /// Stores a derived preview if it still belongs to the selected file.
    ///
    /// Returns `false` when the derivation is stale or nothing is selected.
    pub fn apply_preview(&mut self, file_id: FileId, preview: PreviewRepresentation) -> bool {
        let Some(current) = self.current_mut() else {
            tracing::debug!(?file_id, "preview dropped: no file selected");
            return false;
        };

        if current.id != file_id {
            tracing::debug!(?file_id, current = ?current.id, "preview dropped: stale file");
            return false;
        }

        current.preview = Some(preview);
        true
    }

    /// Returns `true` when the upload action is enabled.
    pub fn can_upload(&self) -> bool {
        matches!(
            self.state,
            ComponentState::LoggedIn(UploadWidget {
                phase: WidgetPhase::Ready(_),
                ..
            })
        )
    }

    /// Returns `true` while an upload is in flight.
    pub fn is_uploading(&self) -> bool {
        matches!(
            self.state,
            ComponentState::LoggedIn(UploadWidget {
                phase: WidgetPhase::Uploading(_),
                ..
            })
        )
    }

    /// Starts an upload for the selected file.
    ///
    /// Returns `None` (a no-op) unless the widget is `Ready`; a second call
    /// while uploading does not start an overlapping sequence.
    pub fn begin_upload(&mut self) -> Option<UploadTicket> {
        let ComponentState::LoggedIn(widget) = &mut self.state else {
            return None;
        };

        let phase = std::mem::replace(&mut widget.phase, WidgetPhase::Idle);
        let WidgetPhase::Ready(current) = phase else {
            widget.phase = phase;
            return None;
        };

        let ticket = UploadTicket {
            file_id: current.id,
            file: current.file.clone(),
        };
        tracing::info!(file = %ticket.file.name, "upload started");
        widget.phase = WidgetPhase::Uploading(current);
        Some(ticket)
    }

    /// Finishes the upload started with `ticket`.
    ///
    /// The widget returns to `Ready`. A new processed result replaces the old
    /// one, which is handed back so the caller can release it; `None` keeps any
    /// earlier result on screen.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        processed: Option<ObjectUrl>,
    ) -> Option<ObjectUrl> {
        let ComponentState::LoggedIn(widget) = &mut self.state else {
            return processed;
        };

        let phase = std::mem::replace(&mut widget.phase, WidgetPhase::Idle);
        widget.phase = match phase {
            WidgetPhase::Uploading(current) => WidgetPhase::Ready(current),
            other => other,
        };

        tracing::info!(
            file = %ticket.file.name,
            processed = processed.is_some(),
            "upload finished"
        );

        match processed {
            Some(url) => widget.processed.replace(url),
            None => None,
        }
    }

    /// Returns the selected file.
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.current().map(|current| &current.file)
    }

    /// Returns the selected file's media kind.
    pub fn selected_kind(&self) -> Option<MediaKind> {
        self.selected_file().map(SelectedFile::kind)
    }

    /// Returns the derived preview for the selected file.
    pub fn preview(&self) -> Option<&PreviewRepresentation> {
        self.current().and_then(|current| current.preview.as_ref())
    }

    /// Returns the processed result reference.
    pub fn processed_result(&self) -> Option<&ObjectUrl> {
        match &self.state {
            ComponentState::LoggedIn(widget) => widget.processed.as_ref(),
            ComponentState::LoggedOut(_) => None,
        }
    }

    /// Renders the current state.
    pub fn render(&self) -> View {
        view::render(&self.state)
    }

    fn widget_mut(&mut self) -> Result<&mut UploadWidget, UiError> {
        match &mut self.state {
            ComponentState::LoggedIn(widget) => Ok(widget),
            ComponentState::LoggedOut(_) => Err(UiError::NotAuthenticated),
        }
    }

    fn current(&self) -> Option<&CurrentFile> {
        match &self.state {
            ComponentState::LoggedIn(widget) => widget.phase.current(),
            ComponentState::LoggedOut(_) => None,
        }
    }

    fn current_mut(&mut self) -> Option<&mut CurrentFile> {
        match &mut self.state {
            ComponentState::LoggedIn(widget) => widget.phase.current_mut(),
            ComponentState::LoggedOut(_) => None,
        }
    }
}

impl Default for FileUploadPreview {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that cannot apply to the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UiError {
    /// The session gate is still showing.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The selection cannot be cleared while its upload is running.
    #[error("upload in progress")]
    UploadInProgress,
}

#[cfg(test)]
mod tests {
    //! Unit tests for gate and widget transitions.

    use preview_gate_core::{Blob, ObjectUrlRegistry};

    use super::*;

    fn logged_in() -> FileUploadPreview {
        let mut component = FileUploadPreview::new();
        component.set_identifier("demo");
        component.set_secret("password");
        assert_eq!(
            component.submit_login(&SessionGate::with_demo_credentials()),
            LoginOutcome::Authenticated
        );
        component
    }

    fn file(name: &str, media_type: &str) -> SelectedFile {
        SelectedFile::new(name, media_type, name.as_bytes().to_vec())
    }

    #[test]
    fn login_transitions_exactly_once() {
        let gate = SessionGate::with_demo_credentials();
        let mut component = logged_in();
        assert!(component.is_authenticated());

        assert_eq!(component.submit_login(&gate), LoginOutcome::AlreadyLoggedIn);
        assert!(!component.set_identifier("other"));
        assert!(component.is_authenticated());
    }

    #[test]
    fn rejected_login_keeps_fields_and_raises_one_alert() {
        let gate = SessionGate::with_demo_credentials();
        let mut component = FileUploadPreview::new();
        component.set_identifier("demo");
        component.set_secret("wrong");

        let outcome = component.submit_login(&gate);
        assert_eq!(
            outcome,
            LoginOutcome::Rejected(Alert {
                message: "Invalid credentials".to_string()
            })
        );
        assert!(!component.is_authenticated());
        assert!(component.pending_alert().is_some());

        let ComponentState::LoggedOut(form) = component.state() else {
            panic!("gate should still be showing");
        };
        assert_eq!(form.credentials.secret, "wrong");

        assert!(component.dismiss_alert().is_some());
        assert!(component.pending_alert().is_none());
    }

    #[test]
    fn widget_events_require_login() {
        let mut component = FileUploadPreview::new();
        assert_eq!(
            component.select_file(file("a.png", "image/png")),
            Err(UiError::NotAuthenticated)
        );
        assert!(component.begin_upload().is_none());
        assert!(!component.is_uploading());
    }

    #[test]
    fn upload_without_file_is_noop() {
        let mut component = logged_in();
        assert!(!component.can_upload());
        assert!(component.begin_upload().is_none());
        assert!(!component.is_uploading());
    }

    #[test]
    fn second_begin_while_uploading_is_refused() {
        let mut component = logged_in();
        component.select_file(file("a.png", "image/png")).expect("select");

        let ticket = component.begin_upload().expect("first upload should start");
        assert!(component.is_uploading());
        assert!(!component.can_upload());
        assert!(component.begin_upload().is_none());

        assert!(component.complete_upload(ticket, None).is_none());
        assert!(component.can_upload());
    }

    #[test]
    fn stale_preview_is_dropped() {
        let mut component = logged_in();
        let first = component.select_file(file("a.png", "image/png")).expect("select a");
        let second = component.select_file(file("b.mp3", "audio/mpeg")).expect("select b");

        assert!(component.apply_preview(second.file_id, second.derive()));
        assert!(!component.apply_preview(first.file_id, first.derive()));

        assert_eq!(component.preview(), Some(&second.derive()));
        assert_eq!(component.selected_kind(), Some(MediaKind::Audio));
    }

    #[test]
    fn reselecting_during_upload_stays_uploading_and_returns_to_ready() {
        let mut component = logged_in();
        component.select_file(file("a.png", "image/png")).expect("select a");
        let ticket = component.begin_upload().expect("upload should start");

        component.select_file(file("b.pdf", "application/pdf")).expect("select b");
        assert!(component.is_uploading());
        assert_eq!(component.clear_selection(), Err(UiError::UploadInProgress));

        component.complete_upload(ticket, None);
        assert!(component.can_upload());
        assert_eq!(component.selected_file().map(|f| f.name.as_str()), Some("b.pdf"));
    }

    #[test]
    fn new_processed_result_hands_back_the_previous_one() {
        let mut registry = ObjectUrlRegistry::new();
        let mut component = logged_in();
        component.select_file(file("a.png", "image/png")).expect("select");

        let first_url = registry.create(Blob::new(vec![1], "image/png"));
        let ticket = component.begin_upload().expect("upload");
        assert!(component.complete_upload(ticket, Some(first_url.clone())).is_none());

        let ticket = component.begin_upload().expect("upload again");
        assert!(component.complete_upload(ticket, None).is_none());
        assert_eq!(component.processed_result(), Some(&first_url));

        let second_url = registry.create(Blob::new(vec![2], "image/png"));
        let ticket = component.begin_upload().expect("third upload");
        assert_eq!(
            component.complete_upload(ticket, Some(second_url.clone())),
            Some(first_url)
        );
        assert_eq!(component.processed_result(), Some(&second_url));
    }

    #[test]
    fn clearing_selection_returns_to_idle_and_drops_preview() {
        let mut component = logged_in();
        let job = component.select_file(file("a.txt", "text/plain")).expect("select");
        assert!(component.apply_preview(job.file_id, job.derive()));

        component.clear_selection().expect("clear should work");
        assert!(component.preview().is_none());
        assert!(component.selected_file().is_none());
        assert!(!component.apply_preview(job.file_id, job.derive()));
    }
}
