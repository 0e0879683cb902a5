// Biblioteca raíz del crate `tablero`.
// Reexporta los módulos principales: el motor de semáforos y agregados, el
// ciclo de vida de evidencias, los modelos, el almacén y el servidor HTTP.
pub mod motor;
pub mod evidencias;
pub mod models;
pub mod api_json;
pub mod datos;
pub mod server;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
