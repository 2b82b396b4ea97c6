use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_parking::config::environment::EnvironmentConfig;
use fleet_parking::create_app;
use fleet_parking::database::{seed_demo_data, DatabaseConnection};
use fleet_parking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fleet_parking=info,tower_http=info")),
        )
        .init();

    info!("🏍️ Fleet Parking - API de estacionamiento");
    info!("==========================================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    if config.is_development() {
        info!("🔧 Modo desarrollo (ENVIRONMENT={})", config.environment);
    }

    // Inicializar almacenamiento
    let connection = match DatabaseConnection::connect(&config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    if config.seed_demo_data {
        match seed_demo_data(connection.store()).await {
            Ok(true) => info!("🌱 Datos de demostración cargados"),
            Ok(false) => info!("🌱 Ya existen motos, no se cargan datos demo"),
            Err(e) => warn!("⚠️ No se pudieron cargar los datos demo: {}", e),
        }
    }

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    let app = create_app(AppState::new(connection.store(), config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("🏍️ /api/motorcycles  (GET, POST, GET /type?type=, GET|PUT|DELETE /:id)");
    info!("🅿️ /api/spots        (GET, POST, GET|PUT|DELETE /:id, POST /:id/release)");
    info!("🗺️ /api/zones        (GET, POST, GET|PUT|DELETE /:id)");
    info!("🏷️ /api/tags         (GET, POST, GET|PUT|DELETE /:id)");
    info!("👤 /api/users        (GET, POST, GET /name?name=, GET|PUT|DELETE /:id)");
    info!("👥 /api/user-categories (GET, POST, GET|DELETE /:id)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
    }

    connection.close().await;
    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
