use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

use crate::api_json::{IndicadorInput, parse_registro, validar_registro};
use crate::models::{Indicador, RegistroPresupuestal};
use crate::motor::{
    ExcesoPresupuestal, Semaforo, clasificar_cumplimiento, clasificar_presupuesto,
    exceso_presupuestal, formato_moneda_mxn, indice_global, meta_cumplida, porcentaje_avance,
    porcentaje_de_sumas, razon_cumplimiento, variacion_modificado,
};

/// Extrae los filtros opcionales `anio` y `trimestre` del query string.
/// Valores no numéricos se ignoran (equivalen a no filtrar).
pub(crate) fn filtros_periodo(qm: &HashMap<String, String>) -> (Option<i32>, Option<i32>) {
    let anio = qm.get("anio").and_then(|s| s.parse::<i32>().ok());
    let trimestre = qm.get("trimestre").and_then(|s| s.parse::<i32>().ok());
    (anio, trimestre)
}

#[derive(Debug, Serialize)]
struct RegistroDto {
    #[serde(flatten)]
    registro: RegistroPresupuestal,
    porcentaje_avance: f64,
    semaforo: Semaforo,
    exceso: ExcesoPresupuestal,
    variacion_modificado: f64,
    pagado_formateado: String,
    modificado_formateado: String,
}

fn registro_a_dto(registro: RegistroPresupuestal) -> RegistroDto {
    let pct = porcentaje_avance(registro.pagado, registro.modificado);
    RegistroDto {
        porcentaje_avance: pct,
        semaforo: clasificar_presupuesto(pct),
        exceso: exceso_presupuestal(registro.pagado, registro.modificado),
        variacion_modificado: variacion_modificado(registro.aprobado, registro.modificado),
        pagado_formateado: formato_moneda_mxn(registro.pagado),
        modificado_formateado: formato_moneda_mxn(registro.modificado),
        registro,
    }
}

#[derive(Debug, Serialize)]
struct IndicadorDto {
    #[serde(flatten)]
    indicador: Indicador,
    porcentaje_cumplimiento: f64,
    semaforo: Semaforo,
    meta_cumplida: bool,
}

fn indicador_a_dto(indicador: Indicador) -> IndicadorDto {
    let pct = razon_cumplimiento(indicador.avance, indicador.meta);
    IndicadorDto {
        porcentaje_cumplimiento: pct,
        semaforo: clasificar_cumplimiento(pct),
        meta_cumplida: meta_cumplida(pct),
        indicador,
    }
}

/// GET /dependencias
pub async fn listar_dependencias_handler() -> impl Responder {
    match crate::datos::listar_dependencias() {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudieron cargar las dependencias: {}", e)})),
    }
}

/// POST /dependencias
pub async fn crear_dependencia_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let cuerpo = body.into_inner();
    let nombre = match cuerpo.get("nombre").and_then(|v| v.as_str()) {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => return HttpResponse::BadRequest().json(json!({"error": "nombre es requerido"})),
    };
    let siglas = cuerpo.get("siglas").and_then(|v| v.as_str()).map(|s| s.to_string());
    match crate::datos::insertar_dependencia(&nombre, siglas.as_deref()) {
        Ok(id) => HttpResponse::Ok().json(json!({"status": "ok", "id": id})),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo guardar la dependencia: {}", e)})),
    }
}

/// GET /dependencias/{id}/presupuesto?anio&trimestre
///
/// Devuelve los registros presupuestales de la dependencia con los valores
/// derivados por el motor (porcentaje sin recorte, semáforo, exceso) y un
/// resumen cuyo porcentaje global usa la suma de montos, no el promedio de
/// porcentajes.
pub async fn presupuesto_handler(
    path: web::Path<i64>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let dependencia_id = path.into_inner();
    let (anio, trimestre) = filtros_periodo(&query.into_inner());

    match crate::datos::registros_por_dependencia(dependencia_id, anio, trimestre) {
        Ok(registros) => {
            let pares: Vec<(f64, f64)> =
                registros.iter().map(|r| (r.pagado, r.modificado)).collect();
            let pct_global = porcentaje_de_sumas(&pares);
            let total_pagado: f64 = pares.iter().map(|(p, _)| p).sum();
            let total_modificado: f64 = pares.iter().map(|(_, m)| m).sum();
            let dtos: Vec<RegistroDto> = registros.into_iter().map(registro_a_dto).collect();
            HttpResponse::Ok().json(json!({
                "dependencia_id": dependencia_id,
                "registros": dtos,
                "resumen": {
                    "porcentaje_avance": pct_global,
                    "semaforo": clasificar_presupuesto(pct_global),
                    "total_pagado": formato_moneda_mxn(total_pagado),
                    "total_modificado": formato_moneda_mxn(total_modificado),
                }
            }))
        }
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo cargar el presupuesto: {}", e)})),
    }
}

/// GET /dependencias/{id}/indicadores?anio&trimestre
pub async fn indicadores_handler(
    path: web::Path<i64>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let dependencia_id = path.into_inner();
    let (anio, trimestre) = filtros_periodo(&query.into_inner());

    match crate::datos::indicadores_por_dependencia(dependencia_id, anio, trimestre) {
        Ok(indicadores) => {
            let porcentajes: Vec<f64> = indicadores
                .iter()
                .map(|i| razon_cumplimiento(i.avance, i.meta))
                .collect();
            // índice de la dependencia: promedio de porcentajes por indicador
            let indice = indice_global(&porcentajes);
            let dtos: Vec<_> = indicadores.into_iter().map(indicador_a_dto).collect();
            HttpResponse::Ok().json(json!({
                "dependencia_id": dependencia_id,
                "indicadores": dtos,
                "resumen": {
                    "indice_cumplimiento": indice,
                    "semaforo": clasificar_cumplimiento(indice),
                }
            }))
        }
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudieron cargar los indicadores: {}", e)})),
    }
}

/// POST /presupuesto
///
/// Captura un registro presupuestal. La única validación de negocio ocurre
/// aquí, en el envío: un exceso (pagado > modificado) sin justificación se
/// rechaza con 400 y un mensaje para el usuario.
pub async fn crear_registro_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let cuerpo = body.into_inner();
    let json_str = match serde_json::to_string(&cuerpo) {
        Ok(s) => s,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("cuerpo JSON inválido: {}", e)}));
        }
    };

    let input = match parse_registro(&json_str) {
        Ok(i) => i,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("no se pudo interpretar el registro: {}", e)}));
        }
    };

    if let Err(e) = validar_registro(&input) {
        return HttpResponse::BadRequest().json(json!({"error": format!("{}", e)}));
    }

    match crate::datos::existe_dependencia(input.dependencia_id) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(
                json!({"error": format!("dependencia {} no encontrada", input.dependencia_id)}),
            );
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudo verificar la dependencia: {}", e)}));
        }
    }

    match crate::datos::insertar_registro(&input) {
        Ok(id) => HttpResponse::Ok().json(json!({"status": "ok", "id": id})),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo guardar el registro: {}", e)})),
    }
}

/// POST /indicadores
pub async fn crear_indicador_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let cuerpo = body.into_inner();
    let input: IndicadorInput = match serde_json::from_value(cuerpo) {
        Ok(i) => i,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("no se pudo interpretar el indicador: {}", e)}));
        }
    };
    match crate::datos::existe_dependencia(input.dependencia_id) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(
                json!({"error": format!("dependencia {} no encontrada", input.dependencia_id)}),
            );
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudo verificar la dependencia: {}", e)}));
        }
    }
    match crate::datos::insertar_indicador(&input) {
        Ok(id) => HttpResponse::Ok().json(json!({"status": "ok", "id": id})),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo guardar el indicador: {}", e)})),
    }
}
