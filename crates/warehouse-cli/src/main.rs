use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use warehouse_core::PaddingScheme;
use warehouse_token::{ErrorKind, TokenError};

mod commands;

use commands::token::IssueSource;

#[derive(Parser, Debug)]
#[command(name = "warehouse", version, about = "Warehouse file access tokens")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authority key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Setup handshake with the authority
    Setup {
        #[command(subcommand)]
        cmd: SetupCommand,
    },

    /// Issue, decode and inspect tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate a new RSA keypair
    Generate {
        /// Modulus size in bits
        #[arg(long, default_value_t = 2048)]
        bits: usize,

        /// Directory to write private.pem and public.pem to (prints them when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum SetupCommand {
    /// Fetch setup information, retrying until the authority answers
    Fetch {
        #[arg(long, env = "WAREHOUSE_HOST")]
        host: String,

        #[arg(long, env = "WAREHOUSE_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Delay between attempts
        #[arg(long, default_value_t = 10_000)]
        retry_delay_ms: u64,

        /// Give up after this many attempts (retries forever when omitted)
        #[arg(long)]
        max_attempts: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Issue a file access token
    Issue {
        /// File the token grants access to
        #[arg(long = "file-id")]
        file_id: String,

        /// Lifetime, e.g. "30m", "2h", "1d" (default: 30 minutes)
        #[arg(long)]
        expires_in: Option<String>,

        /// Absolute expiry, RFC 3339
        #[arg(long, conflicts_with = "expires_in")]
        expires_at: Option<String>,

        /// Configuration file; bootstraps over HTTP
        #[arg(long, conflicts_with_all = ["public_key", "warehouse_name"])]
        config: Option<PathBuf>,

        /// Public key file, for issuing without contacting the authority
        #[arg(long, requires = "warehouse_name")]
        public_key: Option<PathBuf>,

        /// Warehouse name, for offline issuing
        #[arg(long)]
        warehouse_name: Option<String>,

        /// Warehouse host, for offline issuing
        #[arg(long, env = "WAREHOUSE_HOST")]
        host: Option<String>,

        /// Padding scheme, for offline issuing
        #[arg(long, default_value = "oaep-sha1")]
        padding: PaddingScheme,
    },

    /// Decode and validate a token with the authority's private key
    Decode {
        /// Private key file or PEM string
        #[arg(long, env = "WAREHOUSE_PRIVATE_KEY", hide_env_values = true)]
        key: Option<String>,

        #[arg(long, default_value = "oaep-sha1")]
        padding: PaddingScheme,

        token: String,
    },

    /// Show a token's envelope without decrypting it
    Inspect { token: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.cmd).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_code(&e)
        }
    }
}

async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate { bits, output } => commands::keys::generate(bits, output)?,
        },

        Command::Setup { cmd } => match cmd {
            SetupCommand::Fetch {
                host,
                api_key,
                retry_delay_ms,
                max_attempts,
            } => commands::setup::fetch(&host, &api_key, retry_delay_ms, max_attempts).await?,
        },

        Command::Token { cmd } => match cmd {
            TokenCommand::Issue {
                file_id,
                expires_in,
                expires_at,
                config,
                public_key,
                warehouse_name,
                host,
                padding,
            } => {
                let options = commands::token::sign_options(
                    &file_id,
                    expires_in.as_deref(),
                    expires_at.as_deref(),
                )?;

                let source = match (config, public_key) {
                    (Some(path), _) => IssueSource::Config(path),
                    (None, Some(public_key)) => IssueSource::Offline {
                        public_key,
                        warehouse_name: warehouse_name.unwrap_or_default(),
                        host: host
                            .context("--host (or WAREHOUSE_HOST) is required with --public-key")?,
                        padding,
                    },
                    (None, None) => {
                        anyhow::bail!("Pass either --config <file> or --public-key <file>")
                    }
                };

                commands::token::issue(source, options).await?
            }
            TokenCommand::Decode {
                key,
                padding,
                token,
            } => commands::token::decode(key, padding, &token)?,
            TokenCommand::Inspect { token } => commands::token::inspect(&token)?,
        },
    }

    Ok(())
}

/// Exit code 2 for expired tokens, 3 for malformed ones.
fn exit_code(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<TokenError>().map(TokenError::kind) {
        Some(ErrorKind::AccessDenied) => ExitCode::from(2),
        Some(ErrorKind::Malformed) => ExitCode::from(3),
        _ => ExitCode::FAILURE,
    }
}
