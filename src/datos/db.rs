use rusqlite::Connection;
use std::env;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::PathBuf;

// Cliente Postgres para soportar una base remota
use postgres::{Client, NoTls};

/// Abstracción sencilla para la conexión del tablero: SQLite local o
/// Postgres remoto. Para Postgres guardamos sólo la URL y conectamos en un
/// hilo dedicado en el sitio de la operación, para no arrancar un runtime
/// tokio dentro del runtime de Actix.
pub enum DatosConn {
    Sqlite(Connection),
    /// Contiene la URL completa (postgres://...)
    PostgresConfig(String),
}

impl fmt::Debug for DatosConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatosConn::Sqlite(_) => write!(f, "DatosConn::Sqlite(..)"),
            DatosConn::PostgresConfig(_) => write!(f, "DatosConn::PostgresConfig(..)"),
        }
    }
}

fn load_dotenv() {
    let _ = dotenv::dotenv();
}

/// Ruta del archivo de base de datos del tablero. Honra TABLERO_DB_PATH y
/// TABLERO_DB_URL (esquemas sqlite:// y file://); las demás funciones del
/// módulo abren conexiones de vida corta sobre esta ruta.
pub fn datos_db_path() -> PathBuf {
    load_dotenv();
    if let Ok(p) = env::var("TABLERO_DB_PATH") {
        PathBuf::from(p)
    } else if let Ok(p) = env::var("TABLERO_DB_URL") {
        if p.starts_with("sqlite://") {
            let sin_esquema = p.trim_start_matches("sqlite://");
            PathBuf::from(sin_esquema)
        } else if p.starts_with("file://") {
            let sin_esquema = p.trim_start_matches("file://");
            PathBuf::from(sin_esquema)
        } else {
            // Para URLs remotas (postgres://...) no hay ruta local; usar la default
            PathBuf::from("datos/tablero.db")
        }
    } else {
        PathBuf::from("datos/tablero.db")
    }
}

/// Abre una conexión al almacén del tablero. Acepta URLs sqlite://, file://
/// y postgres://.
pub fn open_datos_connection() -> Result<DatosConn, Box<dyn Error>> {
    load_dotenv();
    if let Ok(url) = env::var("TABLERO_DB_URL") {
        if url.starts_with("sqlite://") {
            let path = url.trim_start_matches("sqlite://");
            let conn = Connection::open(path)?;
            return Ok(DatosConn::Sqlite(conn));
        } else if url.starts_with("file://") {
            let path = url.trim_start_matches("file://");
            let conn = Connection::open(path)?;
            return Ok(DatosConn::Sqlite(conn));
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            // Diferir la conexión real al sitio de la operación
            return Ok(DatosConn::PostgresConfig(url));
        } else {
            return Err(format!("TABLERO_DB_URL usa un esquema no soportado: {}", url).into());
        }
    }

    let path = datos_db_path();
    let conn = Connection::open(path)?;
    Ok(DatosConn::Sqlite(conn))
}

const TABLAS_SQLITE: &str = "
    CREATE TABLE IF NOT EXISTS dependencias (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        siglas TEXT
    );

    CREATE TABLE IF NOT EXISTS registros_presupuestales (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        dependencia_id INTEGER NOT NULL,
        anio INTEGER NOT NULL,
        trimestre INTEGER,
        aprobado REAL NOT NULL,
        modificado REAL NOT NULL,
        pagado REAL NOT NULL,
        justificacion_exceso TEXT,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS indicadores (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        fase TEXT,
        meta REAL NOT NULL,
        avance REAL NOT NULL,
        unidad_medida TEXT,
        estado_validacion TEXT,
        dependencia_id INTEGER NOT NULL,
        anio INTEGER NOT NULL,
        trimestre INTEGER,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS compromisos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        dependencia_id INTEGER NOT NULL,
        anio INTEGER NOT NULL,
        trimestre INTEGER,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS metas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        compromiso_id INTEGER NOT NULL,
        nombre TEXT NOT NULL,
        meta REAL NOT NULL,
        avance REAL NOT NULL,
        unidad_medida TEXT,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS obras (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nombre TEXT NOT NULL,
        dependencia_id INTEGER NOT NULL,
        municipio TEXT,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS evidencias (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        obra_id INTEGER NOT NULL,
        nombre_archivo TEXT NOT NULL,
        tamano_bytes REAL NOT NULL,
        estado TEXT NOT NULL,
        comentario TEXT,
        updated_at TEXT NOT NULL
    );
";

const TABLAS_POSTGRES: &str = "
    CREATE TABLE IF NOT EXISTS dependencias (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        siglas TEXT
    );

    CREATE TABLE IF NOT EXISTS registros_presupuestales (
        id BIGSERIAL PRIMARY KEY,
        dependencia_id BIGINT NOT NULL,
        anio INTEGER NOT NULL,
        trimestre INTEGER,
        aprobado DOUBLE PRECISION NOT NULL,
        modificado DOUBLE PRECISION NOT NULL,
        pagado DOUBLE PRECISION NOT NULL,
        justificacion_exceso TEXT,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS indicadores (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        fase TEXT,
        meta DOUBLE PRECISION NOT NULL,
        avance DOUBLE PRECISION NOT NULL,
        unidad_medida TEXT,
        estado_validacion TEXT,
        dependencia_id BIGINT NOT NULL,
        anio INTEGER NOT NULL,
        trimestre INTEGER,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS compromisos (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        dependencia_id BIGINT NOT NULL,
        anio INTEGER NOT NULL,
        trimestre INTEGER,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS metas (
        id BIGSERIAL PRIMARY KEY,
        compromiso_id BIGINT NOT NULL,
        nombre TEXT NOT NULL,
        meta DOUBLE PRECISION NOT NULL,
        avance DOUBLE PRECISION NOT NULL,
        unidad_medida TEXT,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS obras (
        id BIGSERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        dependencia_id BIGINT NOT NULL,
        municipio TEXT,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS evidencias (
        id BIGSERIAL PRIMARY KEY,
        obra_id BIGINT NOT NULL,
        nombre_archivo TEXT NOT NULL,
        tamano_bytes DOUBLE PRECISION NOT NULL,
        estado TEXT NOT NULL,
        comentario TEXT,
        updated_at TEXT NOT NULL
    );
";

/// Inicializa el almacén (crea el directorio, el archivo sqlite y las tablas).
pub fn init_db() -> Result<(), Box<dyn Error>> {
    load_dotenv();
    // Con sqlite local, asegurar que el directorio exista
    let usa_archivo_local = env::var("TABLERO_DB_PATH").is_ok()
        || match env::var("TABLERO_DB_URL") {
            Ok(url) => url.starts_with("sqlite://") || url.starts_with("file://"),
            Err(_) => true,
        };
    if usa_archivo_local {
        let db_path = datos_db_path();
        if let Some(dir) = db_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
    }

    match open_datos_connection() {
        Ok(DatosConn::Sqlite(conn)) => {
            conn.execute_batch(TABLAS_SQLITE)?;
            Ok(())
        }
        Ok(DatosConn::PostgresConfig(url)) => en_hilo_postgres(url, |client| {
            client.batch_execute(TABLAS_POSTGRES).map_err(|e| e.to_string())
        }),
        Err(e) => Err(e),
    }
}

/// Ejecuta una operación Postgres en un hilo dedicado, para no arrancar un
/// runtime tokio dentro del runtime de Actix. Todas las lecturas y capturas
/// del backend Postgres pasan por aquí (mismo patrón que `init_db`).
pub(crate) fn en_hilo_postgres<T, F>(url: String, operacion: F) -> Result<T, Box<dyn Error>>
where
    T: Send + 'static,
    F: FnOnce(&mut Client) -> Result<T, String> + Send + 'static,
{
    let handle = std::thread::spawn(move || -> Result<T, String> {
        let mut client = Client::connect(&url, NoTls).map_err(|e| e.to_string())?;
        operacion(&mut client)
    });
    match handle.join() {
        Ok(Ok(valor)) => Ok(valor),
        Ok(Err(e)) => Err(e.into()),
        Err(e) => Err(format!("thread join error: {:?}", e).into()),
    }
}
