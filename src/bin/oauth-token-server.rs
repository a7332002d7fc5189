use anyhow::Result;
use clap::Parser;
use oauth_token_server::authority::housekeeping::run_cleanup_loop;
use oauth_token_server::authority::TokenAuthority;
use oauth_token_server::grant::GrantProcessor;
use oauth_token_server::observability::metrics::get_metrics;
use oauth_token_server::registry::UserRegistry;
use oauth_token_server::server;
use oauth_token_server::utils::config_loader;
use oauth_token_server::utils::logging;
use oauth_token_server::utils::logging::LogLevel;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "oauth-token-server.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level)?;

    let settings = &service_config.settings;
    warn!("user passwords are configured in plaintext; do not reuse real credentials");

    // -------------------------------
    // 2. Build registry and token authority
    // -------------------------------

    let registry = UserRegistry::from_config(&service_config.users);
    let authority = TokenAuthority::from_config(&settings.token)
        .with_metrics(get_metrics().await.clone());
    let processor = GrantProcessor::new(registry, authority.clone(), &settings.token.realm);

    // -------------------------------
    // 3. Start expired token cleanup and http server
    // -------------------------------

    let cleaner = tokio::spawn(run_cleanup_loop(
        authority,
        settings.token.cleanup_interval_seconds,
    ));

    info!(
        "Service starting, token ttl {} seconds...",
        settings.token.ttl_seconds
    );
    let served = server::server::start(settings, processor).await;
    cleaner.abort();
    served?;

    info!("Service stopped");
    Ok(())
}
