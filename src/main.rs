use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use perinatal::api::HttpGateway;
use perinatal::cli::Cli;
use perinatal::config::Config;
use perinatal::logging;
use perinatal::notify::{
    ChannelNotifier, FanoutNotifier, NotificationLevel, Notifier, TracingNotifier,
};
use perinatal::store::{AppEffects, Store};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
        config.validate()?;
    }

    logging::init(&config.logging, cli.verbose)?;

    let action = cli.resource.to_action()?;

    let gateway = HttpGateway::new(&config.api).context("failed to build HTTP client")?;
    let (channel, mut notifications) = ChannelNotifier::new();
    let notifier = FanoutNotifier::new(vec![
        Arc::new(TracingNotifier) as Arc<dyn Notifier>,
        Arc::new(channel),
    ]);
    let store = Store::start(AppEffects::new(Arc::new(gateway), Arc::new(notifier)));

    tracing::info!(
        resource = cli.resource.name(),
        base_url = %config.api.base_url,
        "Dispatching command"
    );
    store.dispatch(action);
    store.settled().await;

    let state = store.state();
    store.shutdown().await;

    while let Ok(notification) = notifications.try_recv() {
        let marker = match notification.level {
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        eprintln!("[{marker}] {}", notification.message);
    }
    println!("{}", cli.resource.render(&state)?);

    Ok(match cli.resource.error(&state) {
        Some(_) => ExitCode::FAILURE,
        None => ExitCode::SUCCESS,
    })
}
