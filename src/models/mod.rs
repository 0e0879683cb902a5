// Estructuras de datos principales

use serde::{Deserialize, Serialize};

use crate::evidencias::EstadoEvidencia;

/// Unidad organizacional (secretaría, organismo) dueña de registros
/// presupuestales, indicadores, compromisos y obras.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependencia {
    pub id: i64,
    pub nombre: String,
    pub siglas: Option<String>,
}

/// Cifras crudas de presupuesto. Ninguna invariante exige pagado <= modificado:
/// el exceso es un estado válido que se marca y exige justificación al
/// capturarse, no un error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CifrasPresupuesto {
    pub aprobado: f64,
    pub modificado: f64,
    pub pagado: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistroPresupuestal {
    pub id: i64,
    pub dependencia_id: i64,
    pub anio: i32,
    pub trimestre: Option<i32>,
    pub aprobado: f64,
    pub modificado: f64,
    pub pagado: f64,
    pub justificacion_exceso: Option<String>,
    pub updated_at: String,
}

impl RegistroPresupuestal {
    pub fn cifras(&self) -> CifrasPresupuesto {
        CifrasPresupuesto {
            aprobado: self.aprobado,
            modificado: self.modificado,
            pagado: self.pagado,
        }
    }
}

/// Indicador de cumplimiento de una dependencia. Los campos reflejan los
/// registros que expone el API (`meta`, `avance`, `estado_validacion`, etc.).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicador {
    pub id: i64,
    pub nombre: String,
    pub fase: Option<String>,
    /// Valor objetivo del periodo. Con meta 0 la razón de cumplimiento es 0.
    pub meta: f64,
    pub avance: f64,
    pub unidad_medida: Option<String>,
    pub estado_validacion: Option<String>,
    pub dependencia_id: i64,
    pub anio: i32,
    pub trimestre: Option<i32>,
    pub updated_at: String,
}

/// Compromiso de gobierno; agrupa metas y su avance se deriva de ellas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compromiso {
    pub id: i64,
    pub nombre: String,
    pub dependencia_id: i64,
    pub anio: i32,
    pub trimestre: Option<i32>,
    pub updated_at: String,
    #[serde(default)]
    pub metas: Vec<Meta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub id: i64,
    pub compromiso_id: i64,
    pub nombre: String,
    pub meta: f64,
    pub avance: f64,
    pub unidad_medida: Option<String>,
    pub updated_at: String,
}

/// Obra pública; agrupa evidencias con su ciclo de validación.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obra {
    pub id: i64,
    pub nombre: String,
    pub dependencia_id: i64,
    pub municipio: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidencia {
    pub id: i64,
    pub obra_id: i64,
    pub nombre_archivo: String,
    pub tamano_bytes: f64,
    #[serde(flatten)]
    pub estado: EstadoEvidencia,
    pub updated_at: String,
}
