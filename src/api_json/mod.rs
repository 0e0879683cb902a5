use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;

use crate::motor::{exceso_presupuestal, normalizar, parsear_o_cero};

pub mod handlers;

/// Entrada para capturar un registro presupuestal.
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "dependencia_id": 3,
///   "anio": 2025,
///   "trimestre": 2,
///   "aprobado": 1500000,
///   "modificado": "1450000.50",
///   "pagado": "980000,25",
///   "justificacion_exceso": null
/// }
/// ```
///
/// Los campos numéricos aceptan número JSON o cadena (con punto o coma
/// decimal) y degradan a 0 cuando no parsean: es la semántica
/// "parse-or-zero" de los formularios de captura, hecha explícita y total.
/// Negativos y NaN también colapsan a 0; una entrada numérica malformada
/// nunca es un error HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistroInput {
    pub dependencia_id: i64,
    pub anio: i32,
    #[serde(default)]
    pub trimestre: Option<i32>,
    #[serde(default, deserialize_with = "numero_o_cero")]
    pub aprobado: f64,
    #[serde(default, deserialize_with = "numero_o_cero")]
    pub modificado: f64,
    #[serde(default, deserialize_with = "numero_o_cero")]
    pub pagado: f64,
    #[serde(default)]
    pub justificacion_exceso: Option<String>,
}

/// Entrada para registrar un indicador de cumplimiento.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicadorInput {
    pub dependencia_id: i64,
    pub nombre: String,
    #[serde(default)]
    pub fase: Option<String>,
    pub anio: i32,
    #[serde(default)]
    pub trimestre: Option<i32>,
    #[serde(default, deserialize_with = "numero_o_cero")]
    pub meta: f64,
    #[serde(default, deserialize_with = "numero_o_cero")]
    pub avance: f64,
    #[serde(default)]
    pub unidad_medida: Option<String>,
    #[serde(default)]
    pub estado_validacion: Option<String>,
}

/// Entrada para registrar un compromiso (las metas se agregan por separado).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompromisoInput {
    pub dependencia_id: i64,
    pub nombre: String,
    pub anio: i32,
    #[serde(default)]
    pub trimestre: Option<i32>,
}

/// Entrada para agregar una meta a un compromiso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaInput {
    pub nombre: String,
    #[serde(default, deserialize_with = "numero_o_cero")]
    pub meta: f64,
    #[serde(default, deserialize_with = "numero_o_cero")]
    pub avance: f64,
    #[serde(default)]
    pub unidad_medida: Option<String>,
}

/// Entrada para registrar una evidencia de obra (nace en estado pendiente).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenciaInput {
    pub nombre_archivo: String,
    #[serde(default, deserialize_with = "numero_o_cero")]
    pub tamano_bytes: f64,
}

/// Cuerpo del rechazo de una evidencia. El comentario del revisor es
/// obligatorio; la validación ocurre en la transición (`EstadoEvidencia::rechazar`).
#[derive(Debug, Serialize, Deserialize)]
pub struct RechazoInput {
    #[serde(default)]
    pub comentario: String,
}

/// Deserializa un campo numérico con semántica parse-or-zero: acepta número
/// JSON, cadena con punto o coma decimal, o null. Todo lo demás vale 0.
fn numero_o_cero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let valor = serde_json::Value::deserialize(deserializer)?;
    Ok(match valor {
        serde_json::Value::Number(n) => normalizar(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => parsear_o_cero(&s),
        _ => 0.0,
    })
}

pub fn parse_registro(json_str: &str) -> Result<RegistroInput, serde_json::Error> {
    serde_json::from_str::<RegistroInput>(json_str)
}

/// Valida un registro presupuestal en el punto de envío (no de forma
/// continua): cuando `pagado > modificado` la justificación del exceso es
/// obligatoria y su ausencia bloquea la captura con un mensaje para el
/// usuario. Un modificado menor al aprobado NO bloquea; sólo se muestra
/// como variación en el tablero.
pub fn validar_registro(input: &RegistroInput) -> Result<(), Box<dyn Error>> {
    let exceso = exceso_presupuestal(input.pagado, input.modificado);
    if exceso.hay_exceso {
        let justifica = input
            .justificacion_exceso
            .as_deref()
            .map(|j| !j.trim().is_empty())
            .unwrap_or(false);
        if !justifica {
            return Err(format!(
                "el pagado excede al modificado por {:.2}; la justificación del exceso es obligatoria",
                exceso.monto
            )
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numero_o_cero_acepta_cadenas() {
        let json = r#"{
            "dependencia_id": 1,
            "anio": 2025,
            "aprobado": "1500000.75",
            "modificado": "1450000,50",
            "pagado": 980000
        }"#;
        let input = parse_registro(json).expect("Debe parsear cifras como cadena");
        assert_eq!(input.aprobado, 1500000.75);
        assert_eq!(input.modificado, 1450000.50);
        assert_eq!(input.pagado, 980000.0);
        assert_eq!(input.trimestre, None);
    }

    #[test]
    fn test_numero_malformado_vale_cero() {
        let json = r#"{
            "dependencia_id": 1,
            "anio": 2025,
            "aprobado": "no es numero",
            "modificado": -500.0,
            "pagado": null
        }"#;
        let input = parse_registro(json).expect("Debe parsear con degradación a cero");
        assert_eq!(input.aprobado, 0.0);
        assert_eq!(input.modificado, 0.0);
        assert_eq!(input.pagado, 0.0);
    }
}
