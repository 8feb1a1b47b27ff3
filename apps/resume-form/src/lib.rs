//! Resume form client.
//!
//! Signs a user in against a hosted identity provider, collects a multi-section
//! resume form and submits it to a remote resume generation service.
//!
//! - `session`: Session Manager (register, confirm, authenticate, sign out, page guard)
//! - `controller`: Resume Form Controller (initialize, add entries, collect, submit)
//! - `form`: the form model and the JSON payload it produces
//! - `identity`, `resume_service`, `storage`: the external collaborators behind traits

pub mod config;
pub mod controller;
pub mod errors;
pub mod form;
pub mod identity;
pub mod messages;
pub mod resume_service;
pub mod session;
pub mod storage;

pub use config::Config;
pub use controller::{Message, PageState, ResumeFormController, Tone};
pub use errors::{AuthError, FormError, StorageError, SubmitError};
pub use form::{ResumeDraft, ResumeForm, SectionKind, SubmissionPayload};
pub use identity::{CognitoIdentityProvider, IdentityProvider};
pub use resume_service::{ResumeService, ResumeServiceClient, SubmissionReceipt};
pub use session::{Navigation, SessionManager, SessionState, View};
pub use storage::{ClientStorage, FileStorage, MemoryStorage};
