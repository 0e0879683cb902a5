// --- Tablero de Reportes Gubernamentales - Archivo principal ---

use tablero::run_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    println!("=== Tablero de Reportes Gubernamentales (API) ===");

    if let Err(e) = tablero::datos::init_db() {
        log::warn!("no se pudo inicializar el almacén: {}", e);
    }

    let bind = std::env::var("TABLERO_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Iniciando servidor en http://{}", bind);
    run_server(&bind).await
}
