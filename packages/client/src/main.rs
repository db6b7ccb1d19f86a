use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use lockify_client::{
    render::{open_all, render_note, render_notes, OpenedNote},
    ApiClient, ClientError, NoteCipher, Session,
};
use store::{NoteDraft, NotePatch};
use tracing_subscriber::EnvFilter;

/// Encrypted notes from the command line.
#[derive(Debug, Parser)]
#[command(name = "lockify", version, about)]
struct Cli {
    /// API root, including the `/api` prefix.
    #[arg(long, env = "LOCKIFY_API", default_value = "http://127.0.0.1:5000/api", global = true)]
    api: String,

    /// Where the session token is kept (default: `session.json` in the platform data dir).
    #[arg(long, env = "LOCKIFY_SESSION", global = true)]
    session: Option<PathBuf>,

    /// Passphrase for note encryption. Never sent to the server.
    #[arg(long, env = "LOCKIFY_PASSPHRASE", hide_env_values = true, global = true)]
    passphrase: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the server is reachable.
    Health,
    /// Create an account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "LOCKIFY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "LOCKIFY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show the logged-in account.
    Whoami,
    /// Manage notes.
    #[command(subcommand)]
    Notes(NotesCommand),
}

#[derive(Debug, Subcommand)]
enum NotesCommand {
    /// List notes, most recently updated first.
    List,
    /// Encrypt and save a new note.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Change the title and/or content of a note.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note.
    Rm { id: String },
}

struct Context {
    client: ApiClient,
    session_path: PathBuf,
    passphrase: Option<String>,
}

impl Context {
    fn session(&self) -> Result<Session, ClientError> {
        Session::load(&self.session_path)?.ok_or(ClientError::NotLoggedIn)
    }

    fn cipher(&self, session: &Session) -> anyhow::Result<NoteCipher> {
        let Some(passphrase) = self.passphrase.as_deref() else {
            bail!("a passphrase is required for notes (--passphrase or LOCKIFY_PASSPHRASE)");
        };
        Ok(NoteCipher::derive(passphrase, &session.user.email)?)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let session_path = match cli.session {
        Some(path) => path,
        None => Session::default_path().context("no data directory; pass --session")?,
    };
    let ctx = Context {
        client: ApiClient::new(&cli.api)?,
        session_path,
        passphrase: cli.passphrase,
    };

    let result = dispatch(&ctx, cli.command).await;
    if let Err(e) = &result {
        if e.downcast_ref::<ClientError>().is_some_and(ClientError::is_unauthorized) {
            Session::clear(&ctx.session_path)?;
            bail!("session expired; run `lockify login` again");
        }
    }
    result
}

async fn dispatch(ctx: &Context, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Health => {
            let health = ctx.client.health().await?;
            println!("{}", health.message);
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let message = ctx.client.signup(&name, &email, &password).await?;
            println!("{message}");
        }
        Command::Login { email, password } => {
            let session = ctx.client.login(&email, &password).await?;
            session.save(&ctx.session_path)?;
            println!("Logged in as {} <{}>", session.user.full_name, session.user.email);
        }
        Command::Logout => {
            Session::clear(&ctx.session_path)?;
            println!("Logged out");
        }
        Command::Whoami => {
            let session = ctx.session()?;
            let user = ctx.client.me(&session).await?;
            println!("{} <{}>", user.full_name, user.email);
        }
        Command::Notes(command) => notes(ctx, command).await?,
    }
    Ok(())
}

async fn notes(ctx: &Context, command: NotesCommand) -> anyhow::Result<()> {
    let session = ctx.session()?;

    match command {
        NotesCommand::List => {
            let cipher = ctx.cipher(&session)?;
            let notes = ctx.client.list_notes(&session).await?;
            println!("{}", render_notes(&open_all(&cipher, &notes)));
        }
        NotesCommand::Add { title, content } => {
            if title.trim().is_empty() || content.trim().is_empty() {
                bail!("title and content are required");
            }
            let cipher = ctx.cipher(&session)?;
            let draft = NoteDraft {
                title,
                content: cipher.encrypt(&content)?,
            };
            let note = ctx.client.create_note(&session, &draft).await?;
            println!("{}", render_note(&OpenedNote::open(&cipher, &note)));
        }
        NotesCommand::Edit { id, title, content } => {
            if title.is_none() && content.is_none() {
                bail!("nothing to change; pass --title and/or --content");
            }
            let cipher = ctx.cipher(&session)?;
            let content = content.map(|c| cipher.encrypt(&c)).transpose()?;
            let patch = NotePatch { title, content };
            let note = ctx.client.update_note(&session, &id, &patch).await?;
            println!("{}", render_note(&OpenedNote::open(&cipher, &note)));
        }
        NotesCommand::Rm { id } => {
            ctx.client.delete_note(&session, &id).await?;
            println!("Deleted");
        }
    }
    Ok(())
}
