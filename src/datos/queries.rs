use rusqlite::Connection;
use std::error::Error;

use crate::datos::db::{DatosConn, en_hilo_postgres, open_datos_connection};
use crate::evidencias::EstadoEvidencia;
use crate::models::{Compromiso, Dependencia, Evidencia, Indicador, Meta, Obra, RegistroPresupuestal};

// Las lecturas resuelven el backend con `open_datos_connection` (sqlite de
// vida corta, o Postgres en hilo dedicado) y aplican los filtros opcionales
// (dependencia/anio/trimestre) en Rust tras la consulta.

fn filtra_periodo(anio_fila: i32, trimestre_fila: Option<i32>, anio: Option<i32>, trimestre: Option<i32>) -> bool {
    anio.map_or(true, |a| anio_fila == a) && trimestre.map_or(true, |t| trimestre_fila == Some(t))
}

pub fn listar_dependencias() -> Result<Vec<Dependencia>, Box<dyn Error>> {
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => dependencias_sqlite(&conn),
        DatosConn::PostgresConfig(url) => en_hilo_postgres(url, |client| {
            let filas = client
                .query("SELECT id, nombre, siglas FROM dependencias ORDER BY nombre", &[])
                .map_err(|e| e.to_string())?;
            Ok(filas
                .iter()
                .map(|row| Dependencia {
                    id: row.get(0),
                    nombre: row.get(1),
                    siglas: row.get(2),
                })
                .collect())
        }),
    }
}

fn dependencias_sqlite(conn: &Connection) -> Result<Vec<Dependencia>, Box<dyn Error>> {
    let mut stmt = conn.prepare("SELECT id, nombre, siglas FROM dependencias ORDER BY nombre")?;
    let filas = stmt.query_map([], |row| {
        Ok(Dependencia {
            id: row.get(0)?,
            nombre: row.get(1)?,
            siglas: row.get(2)?,
        })
    })?;
    let mut salida = Vec::new();
    for fila in filas {
        salida.push(fila?);
    }
    Ok(salida)
}

/// Verifica que exista una fila con ese id. Las capturas la usan para
/// responder 404 en lugar de colgar registros de un padre inexistente.
fn existe_fila(tabla: &str, id: i64) -> Result<bool, Box<dyn Error>> {
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            let sql = format!("SELECT 1 FROM {} WHERE id = ?1", tabla);
            let mut stmt = conn.prepare(&sql)?;
            Ok(stmt.exists([id])?)
        }
        DatosConn::PostgresConfig(url) => {
            let sql = format!("SELECT 1 FROM {} WHERE id = $1", tabla);
            en_hilo_postgres(url, move |client| {
                let filas = client.query(sql.as_str(), &[&id]).map_err(|e| e.to_string())?;
                Ok(!filas.is_empty())
            })
        }
    }
}

pub fn existe_dependencia(id: i64) -> Result<bool, Box<dyn Error>> {
    existe_fila("dependencias", id)
}

pub fn existe_obra(id: i64) -> Result<bool, Box<dyn Error>> {
    existe_fila("obras", id)
}

pub fn existe_compromiso(id: i64) -> Result<bool, Box<dyn Error>> {
    existe_fila("compromisos", id)
}

const SELECT_REGISTRO: &str =
    "SELECT id, dependencia_id, anio, trimestre, aprobado, modificado, pagado,
            justificacion_exceso, updated_at
     FROM registros_presupuestales ORDER BY anio, trimestre";

fn registros_fetch() -> Result<Vec<RegistroPresupuestal>, Box<dyn Error>> {
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            let mut stmt = conn.prepare(SELECT_REGISTRO)?;
            let filas = stmt.query_map([], |row| {
                Ok(RegistroPresupuestal {
                    id: row.get(0)?,
                    dependencia_id: row.get(1)?,
                    anio: row.get(2)?,
                    trimestre: row.get(3)?,
                    aprobado: row.get(4)?,
                    modificado: row.get(5)?,
                    pagado: row.get(6)?,
                    justificacion_exceso: row.get(7)?,
                    updated_at: row.get(8)?,
                })
            })?;
            let mut salida = Vec::new();
            for fila in filas {
                salida.push(fila?);
            }
            Ok(salida)
        }
        DatosConn::PostgresConfig(url) => en_hilo_postgres(url, |client| {
            let filas = client.query(SELECT_REGISTRO, &[]).map_err(|e| e.to_string())?;
            Ok(filas
                .iter()
                .map(|row| RegistroPresupuestal {
                    id: row.get(0),
                    dependencia_id: row.get(1),
                    anio: row.get(2),
                    trimestre: row.get(3),
                    aprobado: row.get(4),
                    modificado: row.get(5),
                    pagado: row.get(6),
                    justificacion_exceso: row.get(7),
                    updated_at: row.get(8),
                })
                .collect())
        }),
    }
}

pub fn registros_por_dependencia(
    dependencia_id: i64,
    anio: Option<i32>,
    trimestre: Option<i32>,
) -> Result<Vec<RegistroPresupuestal>, Box<dyn Error>> {
    Ok(registros_fetch()?
        .into_iter()
        .filter(|r| r.dependencia_id == dependencia_id)
        .filter(|r| filtra_periodo(r.anio, r.trimestre, anio, trimestre))
        .collect())
}

/// Todos los registros presupuestales del periodo (para los KPI globales).
pub fn registros_todos(
    anio: Option<i32>,
    trimestre: Option<i32>,
) -> Result<Vec<RegistroPresupuestal>, Box<dyn Error>> {
    Ok(registros_fetch()?
        .into_iter()
        .filter(|r| filtra_periodo(r.anio, r.trimestre, anio, trimestre))
        .collect())
}

const SELECT_INDICADOR: &str =
    "SELECT id, nombre, fase, meta, avance, unidad_medida, estado_validacion,
            dependencia_id, anio, trimestre, updated_at
     FROM indicadores ORDER BY nombre";

fn indicadores_fetch() -> Result<Vec<Indicador>, Box<dyn Error>> {
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            let mut stmt = conn.prepare(SELECT_INDICADOR)?;
            let filas = stmt.query_map([], |row| {
                Ok(Indicador {
                    id: row.get(0)?,
                    nombre: row.get(1)?,
                    fase: row.get(2)?,
                    meta: row.get(3)?,
                    avance: row.get(4)?,
                    unidad_medida: row.get(5)?,
                    estado_validacion: row.get(6)?,
                    dependencia_id: row.get(7)?,
                    anio: row.get(8)?,
                    trimestre: row.get(9)?,
                    updated_at: row.get(10)?,
                })
            })?;
            let mut salida = Vec::new();
            for fila in filas {
                salida.push(fila?);
            }
            Ok(salida)
        }
        DatosConn::PostgresConfig(url) => en_hilo_postgres(url, |client| {
            let filas = client.query(SELECT_INDICADOR, &[]).map_err(|e| e.to_string())?;
            Ok(filas
                .iter()
                .map(|row| Indicador {
                    id: row.get(0),
                    nombre: row.get(1),
                    fase: row.get(2),
                    meta: row.get(3),
                    avance: row.get(4),
                    unidad_medida: row.get(5),
                    estado_validacion: row.get(6),
                    dependencia_id: row.get(7),
                    anio: row.get(8),
                    trimestre: row.get(9),
                    updated_at: row.get(10),
                })
                .collect())
        }),
    }
}

pub fn indicadores_por_dependencia(
    dependencia_id: i64,
    anio: Option<i32>,
    trimestre: Option<i32>,
) -> Result<Vec<Indicador>, Box<dyn Error>> {
    Ok(indicadores_fetch()?
        .into_iter()
        .filter(|i| i.dependencia_id == dependencia_id)
        .filter(|i| filtra_periodo(i.anio, i.trimestre, anio, trimestre))
        .collect())
}

/// Todos los indicadores del periodo (para el ICD global).
pub fn indicadores_todos(
    anio: Option<i32>,
    trimestre: Option<i32>,
) -> Result<Vec<Indicador>, Box<dyn Error>> {
    Ok(indicadores_fetch()?
        .into_iter()
        .filter(|i| filtra_periodo(i.anio, i.trimestre, anio, trimestre))
        .collect())
}

const SELECT_COMPROMISO: &str =
    "SELECT id, nombre, dependencia_id, anio, trimestre, updated_at
     FROM compromisos ORDER BY nombre";

const SELECT_METAS: &str =
    "SELECT id, compromiso_id, nombre, meta, avance, unidad_medida, updated_at
     FROM metas ORDER BY id";

fn compromisos_fetch() -> Result<Vec<Compromiso>, Box<dyn Error>> {
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            let mut stmt = conn.prepare(SELECT_COMPROMISO)?;
            let filas = stmt.query_map([], |row| {
                Ok(Compromiso {
                    id: row.get(0)?,
                    nombre: row.get(1)?,
                    dependencia_id: row.get(2)?,
                    anio: row.get(3)?,
                    trimestre: row.get(4)?,
                    updated_at: row.get(5)?,
                    metas: Vec::new(),
                })
            })?;
            let mut compromisos = Vec::new();
            for fila in filas {
                compromisos.push(fila?);
            }
            let mut stmt = conn.prepare(SELECT_METAS)?;
            let filas = stmt.query_map([], |row| {
                Ok(Meta {
                    id: row.get(0)?,
                    compromiso_id: row.get(1)?,
                    nombre: row.get(2)?,
                    meta: row.get(3)?,
                    avance: row.get(4)?,
                    unidad_medida: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })?;
            let mut metas = Vec::new();
            for fila in filas {
                metas.push(fila?);
            }
            Ok(reparte_metas(compromisos, metas))
        }
        DatosConn::PostgresConfig(url) => en_hilo_postgres(url, |client| {
            let filas = client.query(SELECT_COMPROMISO, &[]).map_err(|e| e.to_string())?;
            let compromisos: Vec<Compromiso> = filas
                .iter()
                .map(|row| Compromiso {
                    id: row.get(0),
                    nombre: row.get(1),
                    dependencia_id: row.get(2),
                    anio: row.get(3),
                    trimestre: row.get(4),
                    updated_at: row.get(5),
                    metas: Vec::new(),
                })
                .collect();
            let filas = client.query(SELECT_METAS, &[]).map_err(|e| e.to_string())?;
            let metas: Vec<Meta> = filas
                .iter()
                .map(|row| Meta {
                    id: row.get(0),
                    compromiso_id: row.get(1),
                    nombre: row.get(2),
                    meta: row.get(3),
                    avance: row.get(4),
                    unidad_medida: row.get(5),
                    updated_at: row.get(6),
                })
                .collect();
            Ok(reparte_metas(compromisos, metas))
        }),
    }
}

fn reparte_metas(mut compromisos: Vec<Compromiso>, metas: Vec<Meta>) -> Vec<Compromiso> {
    for meta in metas {
        if let Some(compromiso) = compromisos.iter_mut().find(|c| c.id == meta.compromiso_id) {
            compromiso.metas.push(meta);
        }
    }
    compromisos
}

/// Compromisos con sus metas ya cargadas. Con `dependencia_id` en None
/// devuelve todos (para el IAOP global).
pub fn compromisos_por_dependencia(
    dependencia_id: Option<i64>,
    anio: Option<i32>,
    trimestre: Option<i32>,
) -> Result<Vec<Compromiso>, Box<dyn Error>> {
    Ok(compromisos_fetch()?
        .into_iter()
        .filter(|c| dependencia_id.map_or(true, |dep| c.dependencia_id == dep))
        .filter(|c| filtra_periodo(c.anio, c.trimestre, anio, trimestre))
        .collect())
}

const SELECT_OBRA: &str =
    "SELECT id, nombre, dependencia_id, municipio, updated_at FROM obras ORDER BY nombre";

pub fn listar_obras(dependencia_id: Option<i64>) -> Result<Vec<Obra>, Box<dyn Error>> {
    let obras = match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            let mut stmt = conn.prepare(SELECT_OBRA)?;
            let filas = stmt.query_map([], |row| {
                Ok(Obra {
                    id: row.get(0)?,
                    nombre: row.get(1)?,
                    dependencia_id: row.get(2)?,
                    municipio: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            })?;
            let mut salida = Vec::new();
            for fila in filas {
                salida.push(fila?);
            }
            salida
        }
        DatosConn::PostgresConfig(url) => en_hilo_postgres(url, |client| {
            let filas = client.query(SELECT_OBRA, &[]).map_err(|e| e.to_string())?;
            Ok(filas
                .iter()
                .map(|row| Obra {
                    id: row.get(0),
                    nombre: row.get(1),
                    dependencia_id: row.get(2),
                    municipio: row.get(3),
                    updated_at: row.get(4),
                })
                .collect::<Vec<Obra>>())
        })?,
    };
    Ok(obras
        .into_iter()
        .filter(|o| dependencia_id.map_or(true, |dep| o.dependencia_id == dep))
        .collect())
}

const SELECT_EVIDENCIA: &str =
    "SELECT id, obra_id, nombre_archivo, tamano_bytes, estado, comentario, updated_at
     FROM evidencias ORDER BY id";

type FilaEvidencia = (i64, i64, String, f64, String, Option<String>, String);

fn arma_evidencia(
    (id, obra_id, nombre_archivo, tamano_bytes, estado, comentario, updated_at): FilaEvidencia,
) -> Result<Evidencia, Box<dyn Error>> {
    Ok(Evidencia {
        id,
        obra_id,
        nombre_archivo,
        tamano_bytes,
        estado: EstadoEvidencia::desde_columnas(&estado, comentario)?,
        updated_at,
    })
}

fn evidencias_fetch() -> Result<Vec<Evidencia>, Box<dyn Error>> {
    let filas: Vec<FilaEvidencia> = match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            let mut stmt = conn.prepare(SELECT_EVIDENCIA)?;
            let filas = stmt.query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?;
            let mut salida = Vec::new();
            for fila in filas {
                salida.push(fila?);
            }
            salida
        }
        DatosConn::PostgresConfig(url) => en_hilo_postgres(url, |client| {
            let filas = client.query(SELECT_EVIDENCIA, &[]).map_err(|e| e.to_string())?;
            Ok(filas
                .iter()
                .map(|row| {
                    (
                        row.get(0),
                        row.get(1),
                        row.get(2),
                        row.get(3),
                        row.get(4),
                        row.get(5),
                        row.get(6),
                    )
                })
                .collect::<Vec<FilaEvidencia>>())
        })?,
    };
    let mut salida = Vec::new();
    for fila in filas {
        salida.push(arma_evidencia(fila)?);
    }
    Ok(salida)
}

pub fn evidencias_por_obra(obra_id: i64) -> Result<Vec<Evidencia>, Box<dyn Error>> {
    Ok(evidencias_fetch()?
        .into_iter()
        .filter(|e| e.obra_id == obra_id)
        .collect())
}

pub fn evidencia_por_id(id: i64) -> Result<Option<Evidencia>, Box<dyn Error>> {
    Ok(evidencias_fetch()?.into_iter().find(|e| e.id == id))
}
