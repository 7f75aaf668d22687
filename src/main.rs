use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokio_rewrite::config::Config;
use tokio_rewrite::logging::JsonFormatter;
use tokio_rewrite::middleware::access_log::AccessLogMiddleware;
use tokio_rewrite::middleware::rewrite::RewriteMiddleware;
use tokio_rewrite::middleware::MiddlewareChain;
use tokio_rewrite::server::handlers::RouteInfoHandler;
use tokio_rewrite::server::{Dispatcher, Server};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(JsonFormatter::new(config.logging.service_name.clone())),
        )
        .init();

    info!("Starting tokio_rewrite {} ...", tokio_rewrite::PKG_VERSION);
    config.log_summary();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.worker_count())
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut chain = MiddlewareChain::new();

    if config.middleware.access_log {
        chain = chain.add(AccessLogMiddleware::new());
    }

    match RewriteMiddleware::from_config(&config.rewrite, &config.middleware) {
        Some(mw) => chain = chain.add(mw),
        None => info!("URL rewriting disabled, extension-less URLs will 404"),
    }

    let dispatcher = Dispatcher::new().register(
        config.rewrite.extension_key(),
        Arc::new(RouteInfoHandler::new(config.rewrite.extension_key())),
    );

    let server = Server::new(config.server.clone(), chain, dispatcher);

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                eprintln!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    Ok(())
}
