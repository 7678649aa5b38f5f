// SPDX-License-Identifier: MIT

//! `igord`: the Igor test-execution daemon binary. Builds the `JobCenter`
//! and `Inventory`, starts the background `JobWorker`, and serves the HTTP
//! control surface until told to shut down.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use igor_adapters::fake::{fake_host_origin, fake_profile_origin, FakeHost, FakeProfile};
use igor_adapters::Inventory;
use igor_catalog::FilesystemOrigin;
use igor_core::{SystemClock, Testplan, Testsuite};
use igor_daemon::{config, AppState};
use igor_engine::{EventPublisher, HookRunner, JobCenter, JobWorker};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Igor test-execution daemon.
#[derive(Parser, Debug)]
#[command(name = "igord", version, about)]
struct Cli {
    /// Directory log files are written under. Logs also always go to
    /// stdout; this additionally enables a rolling file appender.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn init_tracing(log_dir: Option<PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "igord.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

fn build_inventory() -> Inventory {
    let mut inventory = Inventory::new();

    inventory.testsuites.register(Arc::new(FilesystemOrigin::<Testsuite>::new("catalog", config::catalog_dir(), |t| &t.name)));
    inventory.plans.register(Arc::new(FilesystemOrigin::<Testplan>::new("catalog", config::catalog_dir(), |t| &t.name)));

    let hosts = config::fake_host_names().into_iter().map(|name| Arc::new(FakeHost::new(name))).collect();
    inventory.hosts.register(Arc::new(fake_host_origin("fake", hosts)));

    let profiles = config::fake_profile_names().into_iter().map(|name| Arc::new(FakeProfile::new(name))).collect();
    inventory.profiles.register(Arc::new(fake_profile_origin("fake", profiles)));

    inventory
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir);

    let events = EventPublisher::new();
    let hooks = Arc::new(HookRunner::new(config::hook_dir(), events));
    let center = JobCenter::new(SystemClock, hooks, config::jobcenter_config());
    let inventory = Arc::new(build_inventory());

    let state = AppState::new(Arc::clone(&center), inventory, config::catalog_dir(), config::auth_token());

    let cancel = CancellationToken::new();
    let worker = JobWorker::new(Arc::clone(&center));
    let worker_cancel = cancel.clone();
    let worker_handle = tokio::spawn(async move {
        worker.run(worker_cancel).await;
    });

    let addr = config::http_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%addr, %err, "failed to bind HTTP listener");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "igord listening");

    let app = igor_daemon::router(state);
    let serve_cancel = cancel.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            serve_cancel.cancel();
        })
        .await;

    cancel.cancel();
    let _ = worker_handle.await;

    if let Err(err) = result {
        tracing::error!(%err, "HTTP server exited with an error");
        std::process::exit(1);
    }

    Ok(())
}
