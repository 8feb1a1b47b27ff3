mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_form::controller::Tone;
use resume_form::messages;
use resume_form::session::welcome_name;
use resume_form::{
    CognitoIdentityProvider, Config, FileStorage, Navigation, ResumeDraft, ResumeForm,
    ResumeFormController, ResumeServiceClient, SessionManager, SessionState, View,
};

use crate::cli::{Cli, Commands};

type Session = SessionManager<CognitoIdentityProvider, FileStorage>;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_form={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-form v{}", env!("CARGO_PKG_VERSION"));

    let provider = CognitoIdentityProvider::new(
        &config.cognito_user_pool_id,
        &config.cognito_client_id,
        config.cognito_endpoint.as_deref(),
    )
    .await?;
    info!("Cognito client initialized");
    let storage = FileStorage::new(&config.session_store_path);
    let mut session = SessionManager::new(provider, storage);

    match cli.command {
        Commands::Register { email, password } => {
            let user = session.register(&email, &password).await?;
            if user.confirmed {
                println!("Registered {}. You can log in now.", user.username);
            } else {
                println!(
                    "Registered {}. Check your email for a confirmation code, then run `resume-form confirm`.",
                    user.username
                );
            }
        }
        Commands::Confirm { email, code } => {
            session.confirm_registration(&email, &code).await?;
            println!("Account {email} confirmed. You can log in now.");
        }
        Commands::Login { email, password } => {
            session.authenticate(&email, &password).await?;
            println!("{}", messages::welcome(welcome_name(&email)));
        }
        Commands::Logout => {
            session.sign_out().await?;
            println!("Signed out.");
        }
        Commands::Status => match session.session_state()? {
            SessionState::Authenticated(s) => println!(
                "Signed in as {}",
                s.user_identifier.as_deref().unwrap_or("<unknown>")
            ),
            SessionState::Unauthenticated => println!("Not signed in."),
        },
        Commands::Submit { draft } => {
            return submit_draft(session, &config, &draft).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn submit_draft(session: Session, config: &Config, draft: &Path) -> Result<ExitCode> {
    let service = ResumeServiceClient::new(&config.resume_service_url);
    let mut page = ResumeFormController::new(session, service, ResumeForm::new());

    if let Navigation::Redirect(_) = page.initialize(View::ResumeForm)? {
        bail!("Not signed in. Run `resume-form login` first.");
    }
    if let Some(welcome) = page.welcome() {
        println!("{welcome}");
    }

    let draft = ResumeDraft::from_path(draft)?;
    page.fill_from_draft(&draft)?;

    let outcome = page.submit().await;

    if let Some(message) = page.message() {
        match message.tone {
            Tone::Success => println!("{}", message.text),
            Tone::Error => eprintln!("{}", message.text),
        }
        if let Some(link) = &message.link {
            println!("{}: {}", link.text, link.href);
        }
    }

    Ok(match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}
