#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use owo_colors::OwoColorize;
use owo_colors::Stream;
use tracing_subscriber::EnvFilter;

use crate::application::cli;
use crate::application::repl;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! chatdesk has failed with the following app version and error.\n\nVersion: {}\nError: {:#}",
            env!("CARGO_PKG_VERSION"),
            err
        )
        .if_supports_color(Stream::Stderr, |e| return e.red())
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
        eprintln!(
            "\nThe debug log is written to {}",
            cli::log_dir().join("debug.log").display()
        );
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

#[tokio::main]
async fn main() {
    better_panic::Settings::auto().install();

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!(
                "{}",
                format!("Warning: failed to load .env file: {err}")
                    .if_supports_color(Stream::Stderr, |e| return e.yellow())
            );
        }
    }

    let file_appender = tracing_appender::rolling::never(cli::log_dir(), "debug.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| return EnvFilter::new("chatdesk=info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();

    let ready = match cli::parse().await {
        Ok(ready) => ready,
        Err(err) => {
            drop(guard);
            handle_error(err);
            return;
        }
    };
    if !ready {
        drop(guard);
        process::exit(0);
    }

    let res = repl::start().await;
    drop(guard);
    if let Err(err) = res {
        handle_error(err);
    }

    // Exit explicitly, a pending stdin read would otherwise hold the runtime
    // open.
    process::exit(0);
}
