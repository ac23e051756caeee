use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use curo::cli::{self, Command};
use curo::config::ClientConfig;
use curo::identity::{FileStorage, SessionStore};
use curo::remote::ApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging; stderr so command output on stdout stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = match Command::parse(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{}\n\n{}", msg, cli::USAGE);
            std::process::exit(2);
        }
    };

    let cfg = ClientConfig::from_env()?;
    let storage = FileStorage::new(cfg.session_file.clone());
    info!(
        target: "curo",
        "curo starting: api_url='{}', session_file='{}'",
        cfg.api_url,
        storage.path().display()
    );

    let sessions = SessionStore::open(storage);
    let client = ApiClient::from_config(&cfg, sessions)?;

    if let Err(e) = cli::execute(&client, cmd).await {
        println!("{}", cli::render_error(&e));
        std::process::exit(1);
    }
    Ok(())
}
