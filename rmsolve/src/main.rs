use clap::Parser as _;
use rmsolve::{AppConfig, BaseArgs};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so that stdout stays valid JSON
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = BaseArgs::parse();
    let config = AppConfig::load(args.config.as_deref())?;
    args.evaluate(config).await
}
