use reportfetch::config::Config;
use reportfetch::context::ExecutionContext;
use reportfetch::pipeline;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{error, info};

use crate::cli::Commands;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub async fn run(command: Commands, config_path: Option<PathBuf>) -> Result<(), AnyError> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    match command {
        Commands::Download => {
            let ctx = ExecutionContext::from_config(config)?;
            listen_for_shutdown(&ctx);
            pipeline::download_worklist(&ctx).await?;
        }
        Commands::Reconcile(args) => {
            let ctx = ExecutionContext::from_config(config)?;
            let report = pipeline::reconcile_worklist(&ctx)?;
            info!(path = %report.annotated_worklist.display(), "Annotated worklist written");
            if args.json {
                print_json(&report.counts)?;
            }
        }
        Commands::Run(args) => {
            let ctx = ExecutionContext::from_config(config)?;
            listen_for_shutdown(&ctx);
            let report = pipeline::run(&ctx).await?;
            if args.json {
                print_json(&report)?;
            }
        }
        Commands::Load => {
            let ctx = ExecutionContext::for_output_dir(config)?;
            pipeline::load_store(&ctx).await?;
        }
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<(), AnyError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Flip the context's shutdown flag on Ctrl+C or SIGTERM
fn listen_for_shutdown(ctx: &ExecutionContext) {
    let flag = ctx.shutdown_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        flag.store(true, Ordering::SeqCst);
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, finishing current row");
}
