use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

use crate::api_json::handlers::dependencias::filtros_periodo;
use crate::api_json::{CompromisoInput, MetaInput};
use crate::models::{Compromiso, Meta};
use crate::motor::{
    Semaforo, clasificar_cumplimiento, indice_global, meta_cumplida, razon_cumplimiento,
};

#[derive(Debug, Serialize)]
struct MetaDto {
    #[serde(flatten)]
    meta: Meta,
    porcentaje_cumplimiento: f64,
    semaforo: Semaforo,
    meta_cumplida: bool,
}

#[derive(Debug, Serialize)]
struct CompromisoDto {
    id: i64,
    nombre: String,
    dependencia_id: i64,
    anio: i32,
    trimestre: Option<i32>,
    updated_at: String,
    /// Promedio de los porcentajes de sus metas (no razón de sumas: las
    /// metas pueden medirse en unidades distintas).
    porcentaje_avance: f64,
    semaforo: Semaforo,
    metas: Vec<MetaDto>,
}

fn compromiso_a_dto(compromiso: Compromiso) -> CompromisoDto {
    let porcentajes: Vec<f64> = compromiso
        .metas
        .iter()
        .map(|m| razon_cumplimiento(m.avance, m.meta))
        .collect();
    let avance = indice_global(&porcentajes);
    let metas = compromiso
        .metas
        .into_iter()
        .map(|meta| {
            let pct = razon_cumplimiento(meta.avance, meta.meta);
            MetaDto {
                porcentaje_cumplimiento: pct,
                semaforo: clasificar_cumplimiento(pct),
                meta_cumplida: meta_cumplida(pct),
                meta,
            }
        })
        .collect();
    CompromisoDto {
        id: compromiso.id,
        nombre: compromiso.nombre,
        dependencia_id: compromiso.dependencia_id,
        anio: compromiso.anio,
        trimestre: compromiso.trimestre,
        updated_at: compromiso.updated_at,
        porcentaje_avance: avance,
        semaforo: clasificar_cumplimiento(avance),
        metas,
    }
}

/// GET /dependencias/{id}/compromisos?anio&trimestre
pub async fn compromisos_handler(
    path: web::Path<i64>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let dependencia_id = path.into_inner();
    let (anio, trimestre) = filtros_periodo(&query.into_inner());

    match crate::datos::compromisos_por_dependencia(Some(dependencia_id), anio, trimestre) {
        Ok(compromisos) => {
            let dtos: Vec<CompromisoDto> =
                compromisos.into_iter().map(compromiso_a_dto).collect();
            HttpResponse::Ok().json(json!({
                "dependencia_id": dependencia_id,
                "compromisos": dtos,
            }))
        }
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudieron cargar los compromisos: {}", e)})),
    }
}

/// POST /compromisos
pub async fn crear_compromiso_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let input: CompromisoInput = match serde_json::from_value(body.into_inner()) {
        Ok(i) => i,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("no se pudo interpretar el compromiso: {}", e)}));
        }
    };
    if input.nombre.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "nombre es requerido"}));
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
    match crate::datos::insertar_compromiso(&input) {
        Ok(id) => HttpResponse::Ok().json(json!({"status": "ok", "id": id})),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo guardar el compromiso: {}", e)})),
    }
}

/// POST /compromisos/{id}/metas
pub async fn crear_meta_handler(
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let compromiso_id = path.into_inner();
    let input: MetaInput = match serde_json::from_value(body.into_inner()) {
        Ok(i) => i,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("no se pudo interpretar la meta: {}", e)}));
        }
    };
    match crate::datos::existe_compromiso(compromiso_id) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound()
                .json(json!({"error": format!("compromiso {} no encontrado", compromiso_id)}));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudo verificar el compromiso: {}", e)}));
        }
    }
    match crate::datos::insertar_meta(compromiso_id, &input) {
        Ok(id) => HttpResponse::Ok().json(json!({"status": "ok", "id": id})),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo guardar la meta: {}", e)})),
    }
}
