// Ciclo de vida de evidencias de obra pública.
//
// Flujo lineal: pendiente -> enviada -> {aprobada | rechazada}, con
// reenvío permitido desde rechazada. Aprobada es terminal. Rechazar exige
// un comentario del revisor; aprobar descarta cualquier comentario previo
// por construcción (la variante `Aprobada` no lo carga).

use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "estado", rename_all = "snake_case")]
pub enum EstadoEvidencia {
    Pendiente,
    Enviada,
    Aprobada,
    Rechazada { comentario: String },
}

impl EstadoEvidencia {
    /// Nombre plano del estado, tal como se persiste en la columna `estado`.
    pub fn nombre(&self) -> &'static str {
        match self {
            EstadoEvidencia::Pendiente => "pendiente",
            EstadoEvidencia::Enviada => "enviada",
            EstadoEvidencia::Aprobada => "aprobada",
            EstadoEvidencia::Rechazada { .. } => "rechazada",
        }
    }

    /// Enviar a revisión. Válido desde `Pendiente` y desde `Rechazada`
    /// (reenvío tras corregir).
    pub fn enviar(&self) -> Result<EstadoEvidencia, Box<dyn Error>> {
        match self {
            EstadoEvidencia::Pendiente | EstadoEvidencia::Rechazada { .. } => {
                Ok(EstadoEvidencia::Enviada)
            }
            otro => Err(format!(
                "no se puede enviar una evidencia en estado '{}'",
                otro.nombre()
            )
            .into()),
        }
    }

    /// Aprobar una evidencia enviada. Estado terminal; cualquier comentario
    /// de rechazo previo queda descartado.
    pub fn aprobar(&self) -> Result<EstadoEvidencia, Box<dyn Error>> {
        match self {
            EstadoEvidencia::Enviada => Ok(EstadoEvidencia::Aprobada),
            otro => Err(format!(
                "no se puede aprobar una evidencia en estado '{}'",
                otro.nombre()
            )
            .into()),
        }
    }

    /// Rechazar una evidencia enviada. El comentario del revisor es
    /// obligatorio: con comentario vacío la transición falla y el estado
    /// no cambia.
    pub fn rechazar(&self, comentario: &str) -> Result<EstadoEvidencia, Box<dyn Error>> {
        if comentario.trim().is_empty() {
            return Err("el rechazo requiere un comentario del revisor".into());
        }
        match self {
            EstadoEvidencia::Enviada => Ok(EstadoEvidencia::Rechazada {
                comentario: comentario.trim().to_string(),
            }),
            otro => Err(format!(
                "no se puede rechazar una evidencia en estado '{}'",
                otro.nombre()
            )
            .into()),
        }
    }

    /// Reconstruye el estado desde las columnas `estado` / `comentario` de
    /// la tabla `evidencias`.
    pub fn desde_columnas(
        estado: &str,
        comentario: Option<String>,
    ) -> Result<EstadoEvidencia, Box<dyn Error>> {
        match estado {
            "pendiente" => Ok(EstadoEvidencia::Pendiente),
            "enviada" => Ok(EstadoEvidencia::Enviada),
            "aprobada" => Ok(EstadoEvidencia::Aprobada),
            "rechazada" => Ok(EstadoEvidencia::Rechazada {
                comentario: comentario.unwrap_or_default(),
            }),
            otro => Err(format!("estado de evidencia desconocido: '{}'", otro).into()),
        }
    }

    /// Par (`estado`, `comentario`) para persistir.
    pub fn a_columnas(&self) -> (&'static str, Option<&str>) {
        match self {
            EstadoEvidencia::Rechazada { comentario } => ("rechazada", Some(comentario.as_str())),
            otro => (otro.nombre(), None),
        }
    }
}
