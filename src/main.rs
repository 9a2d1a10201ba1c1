// src/main.rs

use painter::{
    config::CONFIG,
    display::HeadlessDisplay,
    lang::{self, CommandService, Parser},
    painter::EventLoop,
};

use anyhow::Context;
use log::info;
use tokio::net::TcpListener;

/// Main entry point for the `painter` server.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting painter...");
    let config = &*CONFIG;
    info!("Configuration: {:?}", config);

    // --- Display and event loop ---
    let display = HeadlessDisplay::new(&config.display, config.canvas.size())
        .context("Failed to create display")?;

    let mut event_loop = EventLoop::new(display.clone());
    event_loop
        .start_with(display.clone())
        .context("Failed to start event loop")?;

    // --- HTTP transport ---
    let service = CommandService::new(
        event_loop.handle(),
        Parser::new(config.canvas.coordinates),
        config.server.max_body_bytes,
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let served = runtime.block_on(async {
        let listener = TcpListener::bind(&config.server.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
        let shutdown = lang::http::shutdown_on(tokio::signal::ctrl_c());
        lang::http::serve(listener, lang::router(service), shutdown)
            .await
            .context("HTTP server failed")
    });

    // --- Shutdown ---
    event_loop
        .stop_and_wait()
        .context("Event loop did not stop cleanly")?;
    display.shutdown();

    served?;
    info!("painter exited.");
    Ok(())
}
