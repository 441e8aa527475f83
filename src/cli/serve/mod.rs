//! Serve command - runs the HTTP API

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, error, info, warn};

use crate::api::create_router;
use crate::config::{AppConfig, StorageConfig};
use crate::infrastructure::logging;
use crate::infrastructure::user::{ExportOutcome, UserService};

/// Run the API server until Ctrl+C or SIGTERM
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let state = crate::create_app_state(&config);
    let user_service = state.user_service.clone();

    if config.storage.preload {
        preload_users(user_service.clone(), config.storage.data_file.clone()).await;
    }

    if config.testing.enabled {
        warn!("Test support routes are enabled under /test");
    }
    let app = create_router(state, config.testing.enabled);

    let addr = build_socket_addr(&config)?;
    info!("Starting API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    export_on_shutdown(user_service, &config.storage).await;
    info!("API server shutdown complete");

    Ok(())
}

/// Load the snapshot file into the store if it exists and is non-empty
///
/// Failures are logged; the server starts with whatever the store holds.
async fn preload_users(service: Arc<UserService>, data_file: PathBuf) {
    match tokio::fs::metadata(&data_file).await {
        Ok(meta) if meta.len() > 0 => {}
        Ok(_) => {
            info!(path = %data_file.display(), "Data file is empty, skipping preload");
            return;
        }
        Err(e) => {
            info!(path = %data_file.display(), reason = %e, "No data file to preload");
            return;
        }
    }

    let path = data_file.clone();
    let result =
        tokio::task::spawn_blocking(move || service.load_users_from_json(&path, true)).await;

    match result {
        Ok(Ok(report)) => info!(
            path = %data_file.display(),
            loaded = report.loaded,
            skipped = report.skipped_count(),
            "Preloaded users"
        ),
        Ok(Err(e)) => error!(path = %data_file.display(), error = %e, "Failed to preload users"),
        Err(e) => error!(error = %e, "Preload task failed"),
    }
}

async fn export_on_shutdown(service: Arc<UserService>, storage: &StorageConfig) {
    if !storage.export_on_shutdown {
        debug!("Export on shutdown disabled");
        return;
    }

    let path = storage.data_file.clone();
    let result = tokio::task::spawn_blocking(move || service.export_users_json(&path)).await;

    match result {
        Ok(Ok(ExportOutcome::Written { count })) => {
            info!(path = %storage.data_file.display(), count, "Users exported on shutdown");
        }
        Ok(Ok(ExportOutcome::Empty)) => info!("Store empty, nothing exported on shutdown"),
        Ok(Err(e)) => error!(error = %e, "Failed to export users on shutdown"),
        Err(e) => error!(error = %e, "Export task failed"),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::domain::User;

    #[test]
    fn test_build_socket_addr() {
        let addr = build_socket_addr(&AppConfig::default()).unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_build_socket_addr_rejects_hostname() {
        let mut config = AppConfig::default();
        config.server.host = "localhost".to_string();
        assert!(build_socket_addr(&config).is_err());
    }

    #[tokio::test]
    async fn test_preload_loads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let data = json!({
            "1": {"id": 1, "name": "Walter White", "email": "walter@example.com"},
            "2": {"id": 2, "name": "Bob", "email": "bob@example.com"}
        });
        fs::write(&path, data.to_string()).unwrap();

        let service = Arc::new(UserService::new());
        preload_users(service.clone(), path).await;

        assert_eq!(service.len().unwrap(), 1);
        assert!(service.get_user(1).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_preload_ignores_missing_and_empty_files() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(UserService::new());

        preload_users(service.clone(), dir.path().join("missing.json")).await;

        let empty = dir.path().join("empty.json");
        fs::write(&empty, "").unwrap();
        preload_users(service.clone(), empty).await;

        assert!(service.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_preload_failure_leaves_store_usable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let service = Arc::new(UserService::new());
        preload_users(service.clone(), path).await;

        assert!(service.is_empty().unwrap());
        service
            .add_user(User::new(1, "Walter White", "walter@example.com").unwrap())
            .unwrap();
    }

    #[tokio::test]
    async fn test_export_on_shutdown() {
        let dir = TempDir::new().unwrap();
        let storage = StorageConfig {
            data_file: dir.path().join("users.json"),
            preload: false,
            export_on_shutdown: true,
        };
        let service = Arc::new(UserService::new());
        service
            .add_user(User::new(1, "Walter White", "walter@example.com").unwrap())
            .unwrap();

        export_on_shutdown(service, &storage).await;

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&storage.data_file).unwrap()).unwrap();
        assert_eq!(written["1"]["name"], "Walter White");
    }

    #[tokio::test]
    async fn test_export_on_shutdown_disabled() {
        let dir = TempDir::new().unwrap();
        let storage = StorageConfig {
            data_file: dir.path().join("users.json"),
            preload: false,
            export_on_shutdown: false,
        };
        let service = Arc::new(UserService::new());
        service
            .add_user(User::new(1, "Walter White", "walter@example.com").unwrap())
            .unwrap();

        export_on_shutdown(service, &storage).await;

        assert!(!storage.data_file.exists());
    }
}
