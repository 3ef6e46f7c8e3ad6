//! Logging system demonstration
//!
//! This example shows how to use the logging infrastructure in different modes.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format
//! cargo run --example logging_demo -- compact
//!
//! # With custom filter
//! cargo run --example logging_demo -- pretty "core_runtime=trace"
//! ```

use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};
use std::env;
use tracing::{debug, error, info, instrument, span, trace, warn, Level};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let format = if args.len() > 1 {
        match args[1].as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Pretty,
        }
    } else {
        LogFormat::default()
    };

    let filter = args.get(2).cloned();

    // Initialize logging
    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(Level::TRACE)
        .with_spans(true)
        .with_target(true);

    if let Some(f) = filter {
        config = config.with_filter(f);
    }

    init_logging(config).expect("Failed to initialize logging");

    info!("=== Logging System Demo ===");
    info!(format = ?format, "Logging initialized");

    // Demonstrate different log levels
    demo_log_levels();

    // Demonstrate structured logging
    demo_structured_logging();

    // Demonstrate spans for tracing
    demo_spans().await;

    // Demonstrate redaction helpers
    demo_redaction();

    // Demonstrate instrumentation
    demo_instrumentation().await;

    info!("=== Demo Complete ===");
}

fn demo_log_levels() {
    let span = span!(Level::INFO, "log_levels");
    let _enter = span.enter();

    trace!("This is a TRACE level log");
    debug!("This is a DEBUG level log");
    info!("This is an INFO level log");
    warn!("This is a WARN level log");
    error!("This is an ERROR level log");
}

fn demo_structured_logging() {
    let span = span!(Level::INFO, "structured_logging");
    let _enter = span.enter();

    info!("Simple message without fields");

    info!(
        task_id = 1,
        title = "買い物に行く",
        completed = false,
        "Task information"
    );

    info!(
        task_count = 2,
        pending = 1,
        completed = 1,
        "Collection summary"
    );
}

async fn demo_spans() {
    let span = span!(Level::INFO, "fetch_tasks");
    let _enter = span.enter();

    info!("Starting task fetch");

    {
        let inner_span = span!(Level::DEBUG, "request");
        let _inner = inner_span.enter();

        debug!(method = "GET", path = "/todos", "Dispatching request");
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    {
        let inner_span = span!(Level::DEBUG, "decode");
        let _inner = inner_span.enter();

        debug!(count = 2, "Decoded task collection");
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    info!(count = 2, "Task fetch completed");
}

fn demo_redaction() {
    let span = span!(Level::INFO, "redaction");
    let _enter = span.enter();

    // These values will be redacted by our helper
    let token = "secret_bearer_token_12345";
    let email = "user@example.com";

    info!(
        token = %redact_if_sensitive("token", token),
        email = %redact_if_sensitive("email", email),
        "Sensitive data example"
    );

    // Best practice: Don't log sensitive values at all
    info!("Authentication successful for user");
}

#[instrument]
async fn demo_instrumentation() {
    info!("Instrumented function automatically creates spans");

    let titles = vec!["買い物に行く", "掃除する"];
    process_titles(&titles).await;
}

#[instrument(fields(count = titles.len()))]
async fn process_titles(titles: &[&str]) {
    debug!("Processing titles");

    for (idx, title) in titles.iter().enumerate() {
        process_title(idx, title).await;
    }

    info!("All titles processed");
}

#[instrument(fields(item_id = idx))]
async fn process_title(idx: usize, title: &str) {
    trace!(title = %title, "Processing individual title");
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
}
