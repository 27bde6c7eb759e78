// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ca-enroll-client contributors

//! Command-line certificate enrollment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ca_enroll_client::csr::CsrBuilder;
use ca_enroll_client::{
    bundle, AuthMethod, BearerToken, ClientSecretFlow, EnrollError, EnrollmentClient,
    EnrollmentTarget, StaticToken, TokenSource,
};

#[derive(Parser)]
#[command(name = "ca-enroll-client", version, about = "Enroll a certificate with a CA")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output path for the PKCS#12 bundle
    #[arg(long, global = true, default_value = "my-certificate.pfx")]
    out: PathBuf,

    /// Passphrase protecting the PKCS#12 bundle
    #[arg(long, global = true, default_value = bundle::DEFAULT_PASSPHRASE)]
    bundle_password: String,

    /// Request deadline in seconds
    #[arg(long, global = true, default_value_t = 60)]
    timeout: u64,

    /// Subject common name of the requested certificate
    #[arg(long, global = true, default_value = "Test")]
    common_name: String,
}

#[derive(Subcommand)]
enum Command {
    /// Submit the CSR to the CA's direct CSR API
    Csr(BearerTargetArgs),

    /// Enroll over EST simpleenroll
    Est(BearerTargetArgs),

    /// Re-enroll over EST simplereenroll with an existing client certificate
    Reenroll(ReenrollArgs),
}

#[derive(Args)]
struct BearerTargetArgs {
    /// CA base URL, e.g. https://ca.example.com
    url: String,

    /// API scope of the CA application, widened to <scope>/.default
    scope: String,

    /// OAuth2 client id of the calling application
    #[arg(long)]
    client_id: Option<String>,

    /// Tenant the token is requested from
    #[arg(long)]
    tenant_id: Option<String>,

    /// Authentication method: secret:<value>, cert-file:<path> or cert-store:<thumbprint>
    #[arg(long)]
    auth: Option<String>,

    /// Password for a cert-file: PKCS#12 file
    #[arg(long)]
    cert_password: Option<String>,
}

#[derive(Args)]
struct ReenrollArgs {
    /// CA base URL, e.g. https://ca.example.com
    url: String,

    /// Authentication method: cert-file:<path> or cert-store:<thumbprint>
    #[arg(long)]
    auth: String,

    /// Password for a cert-file: PKCS#12 file
    #[arg(long)]
    cert_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(cli.timeout);

    let (target, token) = match &cli.command {
        Command::Csr(args) => {
            let target = EnrollmentTarget::CsrApi {
                base_url: args.url.clone(),
            };
            (target, Some(acquire_token(args).await?))
        }
        Command::Est(args) => {
            let target = EnrollmentTarget::EstSimpleEnroll {
                base_url: args.url.clone(),
            };
            (target, Some(acquire_token(args).await?))
        }
        Command::Reenroll(args) => {
            let method = AuthMethod::parse(&args.auth, args.cert_password.as_deref())?;
            let identity = method.load_identity()?;
            let target = EnrollmentTarget::EstSimpleReenroll {
                base_url: args.url.clone(),
                identity,
            };
            (target, None)
        }
    };

    let (csr_der, key_pair) = CsrBuilder::new()
        .common_name(cli.common_name.as_str())
        .extended_key_usage_client_auth()
        .build()?;

    let client = EnrollmentClient::new(target, timeout)?;
    let issued = client.submit(&csr_der, token.as_ref()).await?;

    let bundle = bundle::assemble(&issued, &key_pair, &cli.bundle_password)?;
    std::fs::write(&cli.out, &bundle)
        .with_context(|| format!("Failed to write {}", cli.out.display()))?;

    tracing::info!("Wrote certificate bundle to {}", cli.out.display());
    Ok(())
}

/// Resolve a bearer token from the given credentials.
///
/// With `--client-id`, `--tenant-id` and `--auth secret:` the token is
/// acquired through the client-credential flow; without credentials the
/// `ENROLL_BEARER_TOKEN` environment variable is used.
async fn acquire_token(args: &BearerTargetArgs) -> Result<BearerToken, EnrollError> {
    match (&args.auth, &args.client_id, &args.tenant_id) {
        (Some(auth), Some(client_id), Some(tenant_id)) => {
            let method = AuthMethod::parse(auth, args.cert_password.as_deref())?;
            match method {
                AuthMethod::Secret(secret) => {
                    let flow = ClientSecretFlow::new(tenant_id, client_id, secret)?;
                    flow.bearer_token(&args.scope).await
                }
                AuthMethod::CertFile { .. } | AuthMethod::CertStore { .. } => {
                    Err(EnrollError::config(
                        "Certificate-based token acquisition is not supported here; \
                         use secret: or set ENROLL_BEARER_TOKEN",
                    ))
                }
            }
        }
        (None, None, None) => StaticToken::from_env()?.bearer_token(&args.scope).await,
        _ => Err(EnrollError::config(
            "--client-id, --tenant-id and --auth must be given together",
        )),
    }
}
