//! Resume Form Controller: page lifecycle for the resume form.
//!
//! Page state machine:
//! `Unauthenticated → Authenticated → Submitting → SubmitSucceeded | SubmitFailed`,
//! back to `Authenticated` on the next interaction, and to `Unauthenticated` on
//! sign-out from any state.

use tracing::{debug, error, info, warn};

use crate::errors::{FormError, StorageError, SubmitError};
use crate::form::{EntryFields, ResumeDraft, ResumeForm, SectionKind};
use crate::identity::IdentityProvider;
use crate::messages;
use crate::resume_service::{ResumeService, SubmissionReceipt};
use crate::session::{welcome_name, Navigation, SessionManager, View};
use crate::storage::ClientStorage;

/// Flat field pre-filled with the stored identifier.
pub const IDENTITY_FIELD: &str = "email";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Unauthenticated,
    Authenticated,
    Submitting,
    SubmitSucceeded,
    SubmitFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadLink {
    pub href: String,
    pub text: String,
}

/// Contents of the inline message region.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
    pub link: Option<DownloadLink>,
}

impl Message {
    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
            link: None,
        }
    }

    fn success(receipt: &SubmissionReceipt) -> Self {
        Self {
            text: receipt.message.clone(),
            tone: Tone::Success,
            link: receipt.download_url.as_ref().map(|href| DownloadLink {
                href: href.clone(),
                text: messages::DOWNLOAD_LINK_TEXT.to_string(),
            }),
        }
    }
}

/// Holds the page in `Submitting` while a request is pending. Dropping it
/// unsettled (the pending future was dropped) returns the page to `Authenticated`.
struct PendingSubmission<'a> {
    state: &'a mut PageState,
}

impl<'a> PendingSubmission<'a> {
    fn begin(state: &'a mut PageState) -> Self {
        *state = PageState::Submitting;
        Self { state }
    }

    fn settle(self, outcome: PageState) {
        *self.state = outcome;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if *self.state == PageState::Submitting {
            *self.state = PageState::Authenticated;
        }
    }
}

pub struct ResumeFormController<P, S, R> {
    session: SessionManager<P, S>,
    service: R,
    form: ResumeForm,
    state: PageState,
    message: Option<Message>,
    welcome: Option<String>,
}

impl<P, S, R> ResumeFormController<P, S, R>
where
    P: IdentityProvider,
    S: ClientStorage,
    R: ResumeService,
{
    pub fn new(session: SessionManager<P, S>, service: R, form: ResumeForm) -> Self {
        Self {
            session,
            service,
            form,
            state: PageState::Unauthenticated,
            message: None,
            welcome: None,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn welcome(&self) -> Option<&str> {
        self.welcome.as_deref()
    }

    pub fn form(&self) -> &ResumeForm {
        &self.form
    }

    pub fn session(&self) -> &SessionManager<P, S> {
        &self.session
    }

    /// Page-ready hook. Runs the guard, pre-fills the identity field and the
    /// welcome banner, and reports where the page should go.
    pub fn initialize(&mut self, page: View) -> Result<Navigation, StorageError> {
        let guard = self.session.guard_page()?;

        let identifier = self.session.user_identifier()?;
        match identifier.as_deref() {
            Some(identifier) => {
                if let Err(e) = self.form.set_default(IDENTITY_FIELD, identifier) {
                    warn!("Could not pre-fill {IDENTITY_FIELD}: {e}");
                }
                self.welcome = Some(messages::welcome(welcome_name(identifier)));
            }
            None => self.welcome = None,
        }

        self.state = if self.session.session_state()?.is_authenticated() {
            PageState::Authenticated
        } else {
            PageState::Unauthenticated
        };

        if guard != Navigation::Stay {
            return Ok(guard);
        }
        if identifier.is_none() && !page.is_public() {
            return Ok(Navigation::Redirect(View::Login));
        }
        Ok(Navigation::Stay)
    }

    pub async fn sign_out(&mut self) -> Result<Navigation, StorageError> {
        self.state = PageState::Unauthenticated;
        self.message = None;
        self.welcome = None;
        self.session.sign_out().await
    }

    /// Leaves a settled submission state on the next interaction.
    fn acknowledge(&mut self) {
        if matches!(
            self.state,
            PageState::SubmitSucceeded | PageState::SubmitFailed
        ) {
            self.state = PageState::Authenticated;
        }
    }

    /// Adds a block to the section and returns its position. A missing container
    /// is logged and ignored.
    pub fn add_entry(&mut self, kind: SectionKind) -> Option<usize> {
        self.acknowledge();
        match self.form.add_entry(kind) {
            Ok(position) => Some(position),
            Err(e) => {
                warn!("Container with ID {} not found: {e}", kind.container_id());
                None
            }
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        self.acknowledge();
        self.form.set_field(name, value)
    }

    pub fn fill_from_draft(&mut self, draft: &ResumeDraft) -> Result<(), FormError> {
        self.acknowledge();
        self.form.apply_draft(draft)
    }

    pub fn collect_section(&self, container_id: &str, field_names: &[&str]) -> Vec<EntryFields> {
        self.form.collect_section(container_id, field_names).collect()
    }

    /// Sends the form to the resume service. Without a stored identity token the
    /// request is never made. On success the form is reset; on any failure it is
    /// left as it was.
    pub async fn submit(&mut self) -> Result<SubmissionReceipt, SubmitError> {
        self.acknowledge();
        self.message = None;

        let payload = self.form.to_payload();
        debug!("Prepared payload with fields {:?}", payload.fields.keys());

        let token = match self.session.id_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Err(self.reject_unauthenticated(SubmitError::MissingToken)),
            Err(e) => return Err(self.reject_unauthenticated(SubmitError::Storage(e))),
        };

        let pending = PendingSubmission::begin(&mut self.state);
        let result = self.service.submit(&token, &payload).await;

        match result {
            Ok(receipt) => {
                info!("Resume submitted");
                self.message = Some(Message::success(&receipt));
                self.form.reset();
                pending.settle(PageState::SubmitSucceeded);
                Ok(receipt)
            }
            Err(e) => {
                error!("Error submitting form: {e}");
                self.message = Some(Message::error(e.user_message()));
                pending.settle(PageState::SubmitFailed);
                Err(e)
            }
        }
    }

    fn reject_unauthenticated(&mut self, err: SubmitError) -> SubmitError {
        warn!("Submission blocked: {err}");
        self.message = Some(Message::error(err.user_message()));
        self.state = PageState::Unauthenticated;
        err
    }
}
