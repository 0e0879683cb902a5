use chrono::Utc;
use rusqlite::params;
use std::error::Error;

use crate::api_json::{CompromisoInput, EvidenciaInput, IndicadorInput, MetaInput, RegistroInput};
use crate::datos::db::{DatosConn, en_hilo_postgres, open_datos_connection};
use crate::evidencias::EstadoEvidencia;

// Las capturas resuelven el backend con `open_datos_connection`, insertan y
// devuelven el id generado (last_insert_rowid en sqlite, RETURNING id en
// Postgres). La validación de negocio (justificación de exceso, comentario de
// rechazo) ya ocurrió en `api_json` / `evidencias` antes de llegar aquí.

pub fn insertar_dependencia(nombre: &str, siglas: Option<&str>) -> Result<i64, Box<dyn Error>> {
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            conn.execute(
                "INSERT INTO dependencias (nombre, siglas) VALUES (?1, ?2)",
                params![nombre, siglas],
            )?;
            Ok(conn.last_insert_rowid())
        }
        DatosConn::PostgresConfig(url) => {
            let nombre = nombre.to_string();
            let siglas = siglas.map(|s| s.to_string());
            en_hilo_postgres(url, move |client| {
                let row = client
                    .query_one(
                        "INSERT INTO dependencias (nombre, siglas) VALUES ($1, $2) RETURNING id",
                        &[&nombre, &siglas],
                    )
                    .map_err(|e| e.to_string())?;
                Ok(row.get::<_, i64>(0))
            })
        }
    }
}

pub fn insertar_registro(input: &RegistroInput) -> Result<i64, Box<dyn Error>> {
    let ts = Utc::now().to_rfc3339();
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            conn.execute(
                "INSERT INTO registros_presupuestales (
                    dependencia_id, anio, trimestre, aprobado, modificado, pagado,
                    justificacion_exceso, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    input.dependencia_id,
                    input.anio,
                    input.trimestre,
                    input.aprobado,
                    input.modificado,
                    input.pagado,
                    input.justificacion_exceso,
                    ts,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        }
        DatosConn::PostgresConfig(url) => {
            let input = input.clone();
            en_hilo_postgres(url, move |client| {
                let row = client
                    .query_one(
                        "INSERT INTO registros_presupuestales (
                            dependencia_id, anio, trimestre, aprobado, modificado, pagado,
                            justificacion_exceso, updated_at
                        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
                        &[
                            &input.dependencia_id,
                            &input.anio,
                            &input.trimestre,
                            &input.aprobado,
                            &input.modificado,
                            &input.pagado,
                            &input.justificacion_exceso,
                            &ts,
                        ],
                    )
                    .map_err(|e| e.to_string())?;
                Ok(row.get::<_, i64>(0))
            })
        }
    }
}

pub fn insertar_indicador(input: &IndicadorInput) -> Result<i64, Box<dyn Error>> {
    let ts = Utc::now().to_rfc3339();
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            conn.execute(
                "INSERT INTO indicadores (
                    nombre, fase, meta, avance, unidad_medida, estado_validacion,
                    dependencia_id, anio, trimestre, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    input.nombre,
                    input.fase,
                    input.meta,
                    input.avance,
                    input.unidad_medida,
                    input.estado_validacion,
                    input.dependencia_id,
                    input.anio,
                    input.trimestre,
                    ts,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        }
        DatosConn::PostgresConfig(url) => {
            let input = input.clone();
            en_hilo_postgres(url, move |client| {
                let row = client
                    .query_one(
                        "INSERT INTO indicadores (
                            nombre, fase, meta, avance, unidad_medida, estado_validacion,
                            dependencia_id, anio, trimestre, updated_at
                        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
                        &[
                            &input.nombre,
                            &input.fase,
                            &input.meta,
                            &input.avance,
                            &input.unidad_medida,
                            &input.estado_validacion,
                            &input.dependencia_id,
                            &input.anio,
                            &input.trimestre,
                            &ts,
                        ],
                    )
                    .map_err(|e| e.to_string())?;
                Ok(row.get::<_, i64>(0))
            })
        }
    }
}

pub fn insertar_compromiso(input: &CompromisoInput) -> Result<i64, Box<dyn Error>> {
    let ts = Utc::now().to_rfc3339();
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            conn.execute(
                "INSERT INTO compromisos (nombre, dependencia_id, anio, trimestre, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![input.nombre, input.dependencia_id, input.anio, input.trimestre, ts],
            )?;
            Ok(conn.last_insert_rowid())
        }
        DatosConn::PostgresConfig(url) => {
            let input = input.clone();
            en_hilo_postgres(url, move |client| {
                let row = client
                    .query_one(
                        "INSERT INTO compromisos (nombre, dependencia_id, anio, trimestre, updated_at)
                         VALUES ($1, $2, $3, $4, $5) RETURNING id",
                        &[&input.nombre, &input.dependencia_id, &input.anio, &input.trimestre, &ts],
                    )
                    .map_err(|e| e.to_string())?;
                Ok(row.get::<_, i64>(0))
            })
        }
    }
}

pub fn insertar_meta(compromiso_id: i64, input: &MetaInput) -> Result<i64, Box<dyn Error>> {
    let ts = Utc::now().to_rfc3339();
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            conn.execute(
                "INSERT INTO metas (compromiso_id, nombre, meta, avance, unidad_medida, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![compromiso_id, input.nombre, input.meta, input.avance, input.unidad_medida, ts],
            )?;
            Ok(conn.last_insert_rowid())
        }
        DatosConn::PostgresConfig(url) => {
            let input = input.clone();
            en_hilo_postgres(url, move |client| {
                let row = client
                    .query_one(
                        "INSERT INTO metas (compromiso_id, nombre, meta, avance, unidad_medida, updated_at)
                         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
                        &[
                            &compromiso_id,
                            &input.nombre,
                            &input.meta,
                            &input.avance,
                            &input.unidad_medida,
                            &ts,
                        ],
                    )
                    .map_err(|e| e.to_string())?;
                Ok(row.get::<_, i64>(0))
            })
        }
    }
}

pub fn insertar_obra(
    nombre: &str,
    dependencia_id: i64,
    municipio: Option<&str>,
) -> Result<i64, Box<dyn Error>> {
    let ts = Utc::now().to_rfc3339();
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            conn.execute(
                "INSERT INTO obras (nombre, dependencia_id, municipio, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![nombre, dependencia_id, municipio, ts],
            )?;
            Ok(conn.last_insert_rowid())
        }
        DatosConn::PostgresConfig(url) => {
            let nombre = nombre.to_string();
            let municipio = municipio.map(|m| m.to_string());
            en_hilo_postgres(url, move |client| {
                let row = client
                    .query_one(
                        "INSERT INTO obras (nombre, dependencia_id, municipio, updated_at)
                         VALUES ($1, $2, $3, $4) RETURNING id",
                        &[&nombre, &dependencia_id, &municipio, &ts],
                    )
                    .map_err(|e| e.to_string())?;
                Ok(row.get::<_, i64>(0))
            })
        }
    }
}

/// Registra una evidencia nueva; siempre nace en estado pendiente.
pub fn insertar_evidencia(obra_id: i64, input: &EvidenciaInput) -> Result<i64, Box<dyn Error>> {
    let ts = Utc::now().to_rfc3339();
    let (estado, comentario) = EstadoEvidencia::Pendiente.a_columnas();
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            conn.execute(
                "INSERT INTO evidencias (obra_id, nombre_archivo, tamano_bytes, estado, comentario, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![obra_id, input.nombre_archivo, input.tamano_bytes, estado, comentario, ts],
            )?;
            Ok(conn.last_insert_rowid())
        }
        DatosConn::PostgresConfig(url) => {
            let input = input.clone();
            let comentario = comentario.map(|c| c.to_string());
            en_hilo_postgres(url, move |client| {
                let row = client
                    .query_one(
                        "INSERT INTO evidencias (obra_id, nombre_archivo, tamano_bytes, estado, comentario, updated_at)
                         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
                        &[
                            &obra_id,
                            &input.nombre_archivo,
                            &input.tamano_bytes,
                            &estado,
                            &comentario,
                            &ts,
                        ],
                    )
                    .map_err(|e| e.to_string())?;
                Ok(row.get::<_, i64>(0))
            })
        }
    }
}

/// Persiste el estado resultante de una transición del ciclo de evidencias.
///
/// La escritura es condicional: sólo aplica si la fila sigue en `esperado`,
/// el estado que se leyó antes de calcular la transición. Devuelve `false`
/// cuando ninguna fila coincidió (la evidencia no existe o alguien más la
/// movió entre la lectura y esta escritura), y el estado almacenado queda
/// intacto.
pub fn actualizar_estado_evidencia(
    id: i64,
    nuevo: &EstadoEvidencia,
    esperado: &EstadoEvidencia,
) -> Result<bool, Box<dyn Error>> {
    let ts = Utc::now().to_rfc3339();
    let (nombre_nuevo, comentario) = nuevo.a_columnas();
    let (nombre_esperado, _) = esperado.a_columnas();
    match open_datos_connection()? {
        DatosConn::Sqlite(conn) => {
            let afectadas = conn.execute(
                "UPDATE evidencias SET estado = ?1, comentario = ?2, updated_at = ?3
                 WHERE id = ?4 AND estado = ?5",
                params![nombre_nuevo, comentario, ts, id, nombre_esperado],
            )?;
            Ok(afectadas > 0)
        }
        DatosConn::PostgresConfig(url) => {
            let comentario = comentario.map(|c| c.to_string());
            en_hilo_postgres(url, move |client| {
                let afectadas = client
                    .execute(
                        "UPDATE evidencias SET estado = $1, comentario = $2, updated_at = $3
                         WHERE id = $4 AND estado = $5",
                        &[&nombre_nuevo, &comentario, &ts, &id, &nombre_esperado],
                    )
                    .map_err(|e| e.to_string())?;
                Ok(afectadas > 0)
            })
        }
    }
}
