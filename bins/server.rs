use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

use common::utils::logging::{init_logging, LogFormat, DEFAULT_FILTER};
use configs::AppConfig;
use server::startup::resolve_backend;

fn main() -> std::process::ExitCode {
    // Load .env before reading config so RUST_LOG and overrides apply.
    dotenv().ok();

    // Config decides the log format, so load it before logging is up.
    let cfg_result = AppConfig::load_and_validate();
    let (format, filter) = match &cfg_result {
        Ok(cfg) => (
            LogFormat::parse(&cfg.logging.format),
            cfg.logging.filter.clone().unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        ),
        Err(_) => (LogFormat::default(), DEFAULT_FILTER.to_string()),
    };
    init_logging(format, &filter);
    info!(service = "payments", event = "logger_init", "tracing subscriber initialized");

    // Report config errors only after the subscriber exists.
    let cfg = match cfg_result {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "payments", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    // Process identity for log correlation
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Route panics through tracing
    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "payments",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    // First argument selects the backend: "CSV" or anything else for in-memory.
    let arg = std::env::args().nth(1);
    if arg.is_none() {
        warn!(configured = %cfg.storage.backend, "no backend argument given; using configured backend");
    }
    let backend = resolve_backend(arg.as_deref(), &cfg);

    // Runtime
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "payments", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "payments",
        event = "start",
        %service_id,
        pid,
        version,
        %backend,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "payments service starting"
    );

    // Serve until Ctrl+C
    match rt.block_on(server::run(cfg, backend)) {
        Ok(()) => {
            info!(service = "payments", event = "stop", %service_id, pid, "server stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "payments", event = "run_failed", error = %e, "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
