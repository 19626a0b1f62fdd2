//! CLI commands

use anyhow::{Context as _, Result, bail};
use backoffice_core::{ClientSettings, FileTokenStore, StateDir, TokenStore};
use backoffice_frontend_common::{AppStore, NavigationCause, Navigator, Route, RouteGuard};
use backoffice_http::{ApiClient, AuthEvent, ClientError, Credentials, Record};
use clap::Subcommand;
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

const SESSION_EXPIRED: &str = "session expired, run `backoffice login` again";

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session tokens
    Login {
        /// Account name
        #[arg(short, long, env = "BACKOFFICE_USERNAME")]
        username: String,

        /// Password; read from stdin when omitted
        #[arg(short, long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show session and configuration status
    Status,

    /// Resolve a view path through the navigation guard
    Navigate {
        /// View path, e.g. /invoices
        path: String,
    },

    /// GET an API path and print the JSON answer
    Get {
        /// Path relative to the API root, e.g. /shop/orders/
        path: String,
    },

    /// POST JSON to an API path and print the answer
    Post {
        /// Path relative to the API root
        path: String,

        /// JSON request body
        #[arg(long)]
        data: String,
    },

    /// List products
    Products,

    /// List invoices
    Invoices,

    /// Generate a VAT declaration
    VatGenerate {
        /// Period as JSON, e.g. '{"year": 2024, "quarter": 2}'
        #[arg(long)]
        data: String,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the effective configuration to a file
    Init {
        /// Output file path (defaults to the state directory's client.toml)
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Settings and directories shared by every command
pub struct Context {
    settings: ClientSettings,
    state_dir: StateDir,
}

/// Client wired to the persisted session, plus the navigation state
struct Session {
    client: ApiClient,
    navigator: Navigator,
    events: broadcast::Receiver<AuthEvent>,
}

impl Context {
    pub fn new(settings: ClientSettings, state_dir: StateDir) -> Self {
        Self {
            settings,
            state_dir,
        }
    }

    fn token_path(&self) -> PathBuf {
        self.settings
            .token_file
            .clone()
            .unwrap_or_else(|| self.state_dir.token_path())
    }

    fn session(&self) -> Result<Session> {
        self.state_dir.create_directories()?;
        let token_path = self.token_path();
        let store: Arc<dyn TokenStore> = Arc::new(
            FileTokenStore::open(&token_path)
                .with_context(|| format!("opening token file {}", token_path.display()))?,
        );

        let mut builder = ApiClient::builder()
            .base_url(&self.settings.base_url)
            .token_store(Arc::clone(&store))
            .user_agent(&self.settings.user_agent);
        if let Some(timeout) = self.settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let events = client.subscribe();
        debug!(token_file = %token_path.display(), "Session ready");

        Ok(Session {
            client,
            navigator: Navigator::new(RouteGuard::new(store)),
            events,
        })
    }
}

impl Session {
    /// Apply queued auth events and explain a forced logout
    fn settle<T>(&mut self, result: Result<T, ClientError>) -> Result<T> {
        self.navigator.process_pending(&mut self.events);
        let expired = self
            .navigator
            .history()
            .iter()
            .any(|n| n.cause == NavigationCause::SessionExpired);

        match result {
            Err(e) if expired || e.is_session_expired() => Err(e).context(SESSION_EXPIRED),
            Ok(_) if expired => bail!(SESSION_EXPIRED),
            other => Ok(other?),
        }
    }
}

impl Commands {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            Commands::Login { username, password } => login(ctx, username, password).await,
            Commands::Logout => {
                let session = ctx.session()?;
                session.client.logout()?;
                println!("Logged out");
                Ok(())
            }
            Commands::Status => status(ctx),
            Commands::Navigate { path } => {
                let session = ctx.session()?;
                let landed = session.navigator.navigate_path(&path)?;
                println!("{} ({})", landed.path(), landed.name());
                Ok(())
            }
            Commands::Get { path } => {
                let mut session = ctx.session()?;
                let result = session.client.get_json::<Value>(&path).await;
                print_json(&session.settle(result)?)
            }
            Commands::Post { path, data } => {
                let body = parse_body(&data)?;
                let mut session = ctx.session()?;
                let result = session.client.post_json::<Value, _>(&path, &body).await;
                print_json(&session.settle(result)?)
            }
            Commands::Products => {
                let mut session = ctx.session()?;
                let result = session.client.list_products().await;
                print_json(&Value::from(session.settle(result)?))
            }
            Commands::Invoices => {
                let mut session = ctx.session()?;
                let result = session.client.list_invoices().await;
                print_json(&Value::from(session.settle(result)?))
            }
            Commands::VatGenerate { data } => {
                let period = parse_body(&data)?;
                let mut session = ctx.session()?;
                let mut app = AppStore::new(session.client.clone());
                let result = app.accounting.generate_vat_declaration(&period).await;
                print_json(&session.settle(result)?)
            }
            Commands::Config { command } => command.execute(ctx),
        }
    }
}

impl ConfigCommands {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        match self {
            ConfigCommands::Init { output, force } => {
                let config_path = output.unwrap_or_else(|| ctx.state_dir.config_path());
                if config_path.exists() && !force {
                    bail!(
                        "{} already exists, pass --force to overwrite",
                        config_path.display()
                    );
                }

                // Create parent directory if it doesn't exist
                if let Some(parent) = config_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                std::fs::write(&config_path, ctx.settings.to_toml()?)?;
                println!("Generated configuration at: {}", config_path.display());
                Ok(())
            }
        }
    }
}

async fn login(ctx: &Context, username: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    let mut session = ctx.session()?;
    let mut app = AppStore::new(session.client.clone());
    let result = app
        .auth
        .login(&Credentials::new(username.clone(), password))
        .await;

    match result {
        Ok(_) => {
            session.navigator.process_pending(&mut session.events);
            info!(%username, "Session stored");
            println!("Logged in as {username}");
            Ok(())
        }
        Err(ClientError::Unauthorized(message)) => bail!("login rejected: {message}"),
        Err(e) => Err(e.into()),
    }
}

fn status(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let client = &session.client;
    let landing = session
        .navigator
        .guard()
        .resolve(Route::DEFAULT_LANDING);

    println!("API:           {}", client.base_url());
    println!("Token file:    {}", ctx.token_path().display());
    println!("Authenticated: {}", client.is_authenticated());
    println!("Refresh token: {}", client.has_refresh_token());
    println!("Landing view:  {}", landing.path());
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("no password given");
    }
    Ok(password)
}

fn parse_body(data: &str) -> Result<Record> {
    serde_json::from_str(data).context("--data is not valid JSON")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
