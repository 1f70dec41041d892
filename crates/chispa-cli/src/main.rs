mod visits;

use chispa_backend::BackendClient;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "chispa-cli")]
#[command(about = "Chispa field-visit command line interface")]
struct Cli {
    #[command(flatten)]
    credentials: Credentials,
    #[command(subcommand)]
    command: Commands,
}

/// Account used to sign in to the backend.
#[derive(Debug, Args)]
struct Credentials {
    #[arg(long, env = "CHISPA_CLI_EMAIL", global = true)]
    email: Option<String>,
    #[arg(long, env = "CHISPA_CLI_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every promoter that has recorded visits
    Roster,
    /// Show one promoter's visits
    Visits {
        /// Promoter email, matched exactly
        promoter: String,
    },
    /// Sign in and report whether the account has admin clearance
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = chispa_core::load_app_config()?;
    let backend = BackendClient::from_config(&config)?;

    let (Some(email), Some(password)) = (cli.credentials.email, cli.credentials.password) else {
        anyhow::bail!("credentials required: set CHISPA_CLI_EMAIL and CHISPA_CLI_PASSWORD");
    };
    let auth = backend.sign_in_with_password(&email, &password).await?;
    let token = auth.access_token.as_str();

    let result = match cli.command {
        Commands::Roster => visits::run_roster(&backend, token).await,
        Commands::Visits { promoter } => visits::run_visits(&backend, token, &promoter).await,
        Commands::Check => visits::run_check(&backend, token).await,
    };

    if let Err(e) = backend.sign_out(token).await {
        tracing::warn!(error = %e, "sign-out failed");
    }
    result
}
