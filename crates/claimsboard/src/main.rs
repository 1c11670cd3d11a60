//! claimsboard - Medical claims portal from the terminal

mod cli;

use anyhow::{Context, Result};
use claimsboard_core::config::API_BASE_URL_ENV;
use claimsboard_core::extraction::{group_lines, threshold_or_default};
use claimsboard_core::forms::{validate_login, validate_register};
use claimsboard_core::{
    ClaimsApi, CredentialStore, FileCredentialStore, HttpApiClient, PortalConfig, SessionManager,
    SessionPhase, UploadRequest,
};
use claimsboard_types::envelope::LOGIN_FAILED;
use claimsboard_types::{
    ApiErrorDetail, ClaimsQuery, DocumentType, LoginPayload, RegisterPayload, SortDirection,
};
use clap::{Parser, Subcommand};
use cli::CliError;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "claimsboard",
    version,
    about = "Medical claims portal - CLI + Web",
    long_about = "Submit medical documents and follow the claims extracted from them.\n\
                  \n\
                  Talks to the claims portal API with the session token saved by `login`,\n\
                  and serves the web front-end behind the same route guard.\n\
                  \n\
                  Examples:\n\
                    claimsboard login --email jane@example.com   # Password from CLAIMSBOARD_PASSWORD\n\
                    claimsboard claims list --status APPROVED    # First page of approved claims\n\
                    claimsboard claims show c-42                 # Claim with grouped extraction\n\
                    claimsboard upload bill.pdf --type invoice   # Submit a document\n\
                    claimsboard document status d-7 --wait       # Follow processing\n\
                    claimsboard web --port 8080                  # Serve the web front-end\n\
                  \n\
                  Web Frontend Workflow:\n\
                    cd crates/claimsboard-web && trunk build --release\n\
                    claimsboard web                              # Serves the bundle + guard\n\
                  \n\
                  Environment Variables:\n\
                    CLAIMSBOARD_API_BASE_URL                     # Override the API base URL\n\
                    CLAIMSBOARD_CONFIG                           # Config file path\n\
                    CLAIMSBOARD_PASSWORD                         # Password for login/register\n\
                    CLAIMSBOARD_WEB_DIST                         # Built frontend directory\n\
                    RUST_LOG                                     # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL (default: https://api.medicalclaims.example.com/v1)
    #[arg(long, global = true, env = API_BASE_URL_ENV)]
    api_url: Option<String>,

    /// Path to config file (default: <config dir>/claimsboard/config.toml)
    #[arg(long, global = true, env = "CLAIMSBOARD_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and save the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLAIMSBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLAIMSBOARD_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Forget the saved session token
    Logout,
    /// Show whether a session is saved and still accepted
    Status,
    /// Browse claims
    Claims {
        #[command(subcommand)]
        action: ClaimsCommand,
    },
    /// Upload a document for processing
    Upload {
        /// PDF or image to submit
        file: PathBuf,
        /// invoice | discharge-summary | prescription
        #[arg(long = "type")]
        document_type: DocumentType,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Inspect an uploaded document
    Document {
        #[command(subcommand)]
        action: DocumentCommand,
    },
    /// Run the web front-end server
    Web {
        /// Port for web server
        #[arg(long, default_value = "3333")]
        port: u16,
    },
}

#[derive(Subcommand)]
enum ClaimsCommand {
    /// List claims, one page at a time
    List {
        /// Filter by status (ALL for no filter)
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value_t = ClaimsQuery::DEFAULT_LIMIT)]
        limit: u32,
        #[arg(long, default_value = "createdAt")]
        sort_by: String,
        /// asc | desc
        #[arg(long, default_value = "desc")]
        direction: SortDirection,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one claim with its extracted fields grouped by confidence
    Show {
        claim_id: String,
        /// Minimum confidence (default: the claim's own threshold, else 0.7)
        #[arg(long)]
        threshold: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DocumentCommand {
    /// Print a temporary download URL
    Url { document_id: String },
    /// Show processing status
    Status {
        document_id: String,
        /// Poll until processing finishes
        #[arg(long)]
        wait: bool,
        /// Give up waiting after this many seconds
        #[arg(long, default_value = "300", requires = "wait")]
        max_wait: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

type Session = SessionManager<HttpApiClient>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if matches!(cli.command, Command::Web { .. }) {
        "info"
    } else {
        "warn"
    };
    init_tracing(default_level);

    let config = load_config(cli.config.as_deref(), cli.api_url)?;
    debug!(api = %config.api_base_url, "Configuration loaded");

    match cli.command {
        Command::Web { port } => run_web(&config, port).await?,
        Command::Login { email, password } => {
            run_login(&connect(&config)?, email, password).await?
        }
        Command::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let payload = RegisterPayload {
                email,
                password,
                first_name,
                last_name,
            };
            run_register(&connect(&config)?, payload).await?
        }
        Command::Logout => run_logout(&connect(&config)?),
        Command::Status => run_status(&config, &connect(&config)?).await?,
        Command::Claims { action } => {
            let session = connect(&config)?;
            require_login(&session)?;
            match action {
                ClaimsCommand::List {
                    status,
                    page,
                    limit,
                    sort_by,
                    direction,
                    json,
                } => {
                    let query = ClaimsQuery {
                        status,
                        page: page.max(1),
                        limit: limit.max(1),
                        sort_by,
                        sort_direction: direction,
                    };
                    run_claims_list(&session, &query, json).await?
                }
                ClaimsCommand::Show {
                    claim_id,
                    threshold,
                    json,
                } => run_claims_show(&session, &claim_id, threshold, json).await?,
            }
        }
        Command::Upload {
            file,
            document_type,
            description,
        } => {
            let session = connect(&config)?;
            require_login(&session)?;
            run_upload(&session, &file, document_type, description).await?
        }
        Command::Document { action } => {
            let session = connect(&config)?;
            require_login(&session)?;
            match action {
                DocumentCommand::Url { document_id } => {
                    run_document_url(&session, &document_id).await?
                }
                DocumentCommand::Status {
                    document_id,
                    wait,
                    max_wait,
                    json,
                } => {
                    let max_wait = wait.then(|| Duration::from_secs(max_wait));
                    run_document_status(&session, &document_id, max_wait, json).await?
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then config file, then `CLAIMSBOARD_API_BASE_URL`, then `--api-url`
fn load_config(path: Option<&Path>, api_url: Option<String>) -> Result<PortalConfig> {
    let config = PortalConfig::load(path)
        .context("Failed to load configuration")?
        .with_env_overrides()
        .with_base_url_override(api_url);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Session backed by the credentials file, with any saved token restored
fn connect(config: &PortalConfig) -> Result<Session> {
    let path = config
        .credentials_path()
        .context("Could not determine credentials location")?;
    debug!(path = %path.display(), "Using credentials file");

    let credentials: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(path));
    let api = HttpApiClient::new(config, Arc::clone(&credentials))
        .context("Failed to create API client")?;
    let session = SessionManager::new(api, credentials);
    session.initialize_auth();
    Ok(session)
}

fn require_login(session: &Session) -> Result<(), CliError> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

async fn run_web(config: &PortalConfig, port: u16) -> Result<()> {
    claimsboard_web::run(config, port).await
}

async fn run_login(session: &Session, email: String, password: String) -> Result<()> {
    let payload = LoginPayload { email, password };
    let errors = validate_login(&payload);
    if !errors.is_empty() {
        return Err(CliError::Invalid(errors).into());
    }

    if session.login(&payload.email, &payload.password).await {
        let name = session
            .user()
            .map(|u| u.display_name())
            .unwrap_or(payload.email);
        println!("✓ Logged in as {}", name);
        return Ok(());
    }

    let error = session
        .snapshot()
        .last_error
        .unwrap_or_else(|| ApiErrorDetail::new(LOGIN_FAILED, "Login failed"));
    Err(CliError::Api {
        action: "Login",
        error,
    }
    .into())
}

async fn run_register(session: &Session, payload: RegisterPayload) -> Result<()> {
    let errors = validate_register(&payload);
    if !errors.is_empty() {
        return Err(CliError::Invalid(errors).into());
    }

    let user = cli::expect_data(
        session.register(&payload).await,
        "Registration",
        "REGISTER_FAILED",
    )?;
    println!("✓ Account created for {} <{}>", user.display_name(), user.email);
    println!("  Run `claimsboard login --email {}` to sign in", user.email);
    Ok(())
}

fn run_logout(session: &Session) {
    let was_logged_in = session.is_authenticated();
    session.logout();
    if was_logged_in {
        println!("✓ Logged out");
    } else {
        println!("No saved session");
    }
}

async fn run_status(config: &PortalConfig, session: &Session) -> Result<()> {
    println!("API:     {}", config.api_base_url);

    match session.phase() {
        SessionPhase::Idle | SessionPhase::Authenticating => {
            println!("Session: not logged in");
            Ok(())
        }
        SessionPhase::Authenticated | SessionPhase::TokenOnly => {
            if let Ok(path) = config.credentials_path() {
                println!("Session: token saved in {}", path.display());
            }

            // Cheapest authenticated call tells us whether the token still works
            let probe = ClaimsQuery {
                limit: 1,
                ..ClaimsQuery::default()
            };
            let page = cli::expect_data(
                session.api().list_claims(&probe).await,
                "Checking session",
                "STATUS_FAILED",
            )?;
            println!(
                "Token:   accepted ({} claims on file)",
                page.pagination.total_items
            );
            Ok(())
        }
    }
}

async fn run_claims_list(session: &Session, query: &ClaimsQuery, json: bool) -> Result<()> {
    let page = cli::expect_data(
        session.api().list_claims(query).await,
        "Listing claims",
        "LIST_FAILED",
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.claims.is_empty() {
        println!("No claims found");
    } else {
        println!("{}", cli::claims_table(&page));
    }
    println!("{}", cli::pagination_summary(&page.pagination));
    Ok(())
}

async fn run_claims_show(
    session: &Session,
    claim_id: &str,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    let claim = cli::expect_data(
        session.api().get_claim(claim_id).await,
        "Loading claim",
        "CLAIM_FAILED",
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&claim)?);
        return Ok(());
    }

    let threshold = threshold_or_default(threshold.or(claim.confidence_threshold()));
    let grouped = group_lines(&claim.extracted_data.lines, threshold);
    print!("{}", cli::render_claim(&claim, &grouped, threshold));
    Ok(())
}

async fn run_upload(
    session: &Session,
    file: &Path,
    document_type: DocumentType,
    description: String,
) -> Result<()> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .context("Upload path has no file name")?;

    let progress = spinner(&format!("Uploading {}...", file_name));
    let upload = UploadRequest {
        file_name,
        bytes,
        content_type: None,
        document_type,
        description,
    };
    let response = session.api().upload_document(upload).await;
    progress.finish_and_clear();

    let document = cli::expect_data(response, "Upload", "UPLOAD_FAILED")?;
    println!("✓ Document uploaded successfully");
    println!("{}", cli::uploaded_document_table(&document));
    println!(
        "Follow processing with `claimsboard document status {} --wait`",
        document.document_id
    );
    Ok(())
}

async fn run_document_url(session: &Session, document_id: &str) -> Result<()> {
    let url = cli::expect_data(
        session.api().document_url(document_id).await,
        "Fetching document URL",
        "URL_FAILED",
    )?;
    println!("{}", cli::presigned_url_line(&url));
    Ok(())
}

async fn run_document_status(
    session: &Session,
    document_id: &str,
    max_wait: Option<Duration>,
    json: bool,
) -> Result<()> {
    const POLL_INTERVAL: Duration = Duration::from_secs(2);

    let fetch = || async {
        cli::expect_data(
            session.api().document_status(document_id).await,
            "Fetching document status",
            "STATUS_FAILED",
        )
    };

    let status = match max_wait {
        Some(max_wait) => {
            let progress = spinner("Waiting for processing...");
            let result = cli::poll_until_done(fetch, POLL_INTERVAL, max_wait, |status| {
                progress.set_message(format!("Processing... {}%", status.progress.min(100)));
            })
            .await;
            progress.finish_and_clear();
            result?
        }
        None => fetch().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", cli::document_status_table(&status));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload_type() {
        let cli = Cli::try_parse_from([
            "claimsboard",
            "upload",
            "bill.pdf",
            "--type",
            "discharge-summary",
        ])
        .unwrap();
        match cli.command {
            Command::Upload {
                document_type,
                description,
                ..
            } => {
                assert_eq!(document_type, DocumentType::DischargeSummary);
                assert!(description.is_empty());
            }
            _ => panic!("Expected upload command"),
        }

        assert!(
            Cli::try_parse_from(["claimsboard", "upload", "x.pdf", "--type", "receipt"]).is_err()
        );
    }

    #[test]
    fn test_parse_claims_list_defaults() {
        let cli = Cli::try_parse_from(["claimsboard", "claims", "list"]).unwrap();
        match cli.command {
            Command::Claims {
                action:
                    ClaimsCommand::List {
                        status,
                        page,
                        limit,
                        sort_by,
                        direction,
                        json,
                    },
            } => {
                assert!(status.is_none());
                assert_eq!(page, 1);
                assert_eq!(limit, ClaimsQuery::DEFAULT_LIMIT);
                assert_eq!(sort_by, "createdAt");
                assert_eq!(direction, SortDirection::Desc);
                assert!(!json);
            }
            _ => panic!("Expected claims list"),
        }
    }

    #[test]
    fn test_parse_document_wait_limit() {
        let cli = Cli::try_parse_from(["claimsboard", "document", "status", "d-1", "--wait"])
            .unwrap();
        match cli.command {
            Command::Document {
                action: DocumentCommand::Status { wait, max_wait, .. },
            } => {
                assert!(wait);
                assert_eq!(max_wait, 300);
            }
            _ => panic!("Expected document status"),
        }

        assert!(Cli::try_parse_from([
            "claimsboard",
            "document",
            "status",
            "d-1",
            "--max-wait",
            "10",
        ])
        .is_err());
    }

    #[test]
    fn test_load_config_flag_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://file.example.com/v1\"\nrequest_timeout_secs = 5\n",
        )
        .unwrap();

        let config = load_config(Some(&path), Some("http://localhost:4000".to_string())).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:4000");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_load_config_rejects_bad_flag() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load_config(Some(&missing), Some("ftp://nope".to_string())).is_err());
    }
}
