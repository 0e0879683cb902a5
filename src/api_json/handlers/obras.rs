use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

use crate::api_json::{EvidenciaInput, RechazoInput};
use crate::evidencias::EstadoEvidencia;
use crate::models::Evidencia;
use crate::motor::formato_tamano_archivo;

#[derive(Debug, Serialize)]
struct EvidenciaDto {
    id: i64,
    obra_id: i64,
    nombre_archivo: String,
    tamano_bytes: f64,
    tamano: String,
    #[serde(flatten)]
    estado: EstadoEvidencia,
    updated_at: String,
}

fn evidencia_a_dto(evidencia: Evidencia) -> EvidenciaDto {
    EvidenciaDto {
        id: evidencia.id,
        obra_id: evidencia.obra_id,
        nombre_archivo: evidencia.nombre_archivo,
        tamano: formato_tamano_archivo(evidencia.tamano_bytes),
        tamano_bytes: evidencia.tamano_bytes,
        estado: evidencia.estado,
        updated_at: evidencia.updated_at,
    }
}

/// GET /obras?dependencia_id
pub async fn listar_obras_handler(query: web::Query<HashMap<String, String>>) -> impl Responder {
    let dependencia_id = query
        .into_inner()
        .get("dependencia_id")
        .and_then(|s| s.parse::<i64>().ok());
    match crate::datos::listar_obras(dependencia_id) {
        Ok(v) => HttpResponse::Ok().json(v),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudieron cargar las obras: {}", e)})),
    }
}

/// POST /obras
pub async fn crear_obra_handler(body: web::Json<serde_json::Value>) -> impl Responder {
    let cuerpo = body.into_inner();
    let nombre = match cuerpo.get("nombre").and_then(|v| v.as_str()) {
        Some(n) if !n.trim().is_empty() => n.trim().to_string(),
        _ => return HttpResponse::BadRequest().json(json!({"error": "nombre es requerido"})),
    };
    let dependencia_id = match cuerpo.get("dependencia_id").and_then(|v| v.as_i64()) {
        Some(d) => d,
        None => {
            return HttpResponse::BadRequest()
                .json(json!({"error": "dependencia_id es requerido"}));
        }
    };
    let municipio = cuerpo.get("municipio").and_then(|v| v.as_str()).map(|s| s.to_string());
    match crate::datos::existe_dependencia(dependencia_id) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound()
                .json(json!({"error": format!("dependencia {} no encontrada", dependencia_id)}));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudo verificar la dependencia: {}", e)}));
        }
    }
    match crate::datos::insertar_obra(&nombre, dependencia_id, municipio.as_deref()) {
        Ok(id) => HttpResponse::Ok().json(json!({"status": "ok", "id": id})),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo guardar la obra: {}", e)})),
    }
}

/// GET /obras/{id}/evidencias
pub async fn evidencias_handler(path: web::Path<i64>) -> impl Responder {
    let obra_id = path.into_inner();
    match crate::datos::evidencias_por_obra(obra_id) {
        Ok(evidencias) => {
            let dtos: Vec<EvidenciaDto> = evidencias.into_iter().map(evidencia_a_dto).collect();
            HttpResponse::Ok().json(json!({"obra_id": obra_id, "evidencias": dtos}))
        }
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudieron cargar las evidencias: {}", e)})),
    }
}

/// POST /obras/{id}/evidencias — registra una evidencia en estado pendiente.
pub async fn crear_evidencia_handler(
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let obra_id = path.into_inner();
    let input: EvidenciaInput = match serde_json::from_value(body.into_inner()) {
        Ok(i) => i,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("no se pudo interpretar la evidencia: {}", e)}));
        }
    };
    if input.nombre_archivo.trim().is_empty() {
        return HttpResponse::BadRequest().json(json!({"error": "nombre_archivo es requerido"}));
    }
    match crate::datos::existe_obra(obra_id) {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound()
                .json(json!({"error": format!("obra {} no encontrada", obra_id)}));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudo verificar la obra: {}", e)}));
        }
    }
    match crate::datos::insertar_evidencia(obra_id, &input) {
        Ok(id) => HttpResponse::Ok().json(json!({"status": "ok", "id": id})),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo guardar la evidencia: {}", e)})),
    }
}

// Aplica una transición del ciclo de evidencias y la persiste. Una
// transición inválida responde 400 y no cambia el estado guardado. La
// escritura es condicional al estado leído: si otra petición movió la
// evidencia entre la lectura y la escritura, la actualización no aplica y
// se responde 409.
fn aplicar_transicion<F>(id: i64, transicion: F) -> HttpResponse
where
    F: FnOnce(&EstadoEvidencia) -> Result<EstadoEvidencia, Box<dyn std::error::Error>>,
{
    let evidencia = match crate::datos::evidencia_por_id(id) {
        Ok(Some(e)) => e,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(json!({"error": format!("evidencia {} no encontrada", id)}));
        }
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudo cargar la evidencia: {}", e)}));
        }
    };

    let nuevo_estado = match transicion(&evidencia.estado) {
        Ok(estado) => estado,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": format!("{}", e)})),
    };

    match crate::datos::actualizar_estado_evidencia(id, &nuevo_estado, &evidencia.estado) {
        Ok(true) => HttpResponse::Ok().json(json!({"status": "ok", "id": id, "nuevo": nuevo_estado})),
        Ok(false) => HttpResponse::Conflict().json(json!({
            "error": format!("la evidencia {} cambió de estado; recargue e intente de nuevo", id)
        })),
        Err(e) => HttpResponse::InternalServerError()
            .json(json!({"error": format!("no se pudo actualizar la evidencia: {}", e)})),
    }
}

/// POST /evidencias/{id}/enviar
pub async fn enviar_evidencia_handler(path: web::Path<i64>) -> impl Responder {
    aplicar_transicion(path.into_inner(), |estado| estado.enviar())
}

/// POST /evidencias/{id}/aprobar — descarta cualquier comentario de rechazo previo.
pub async fn aprobar_evidencia_handler(path: web::Path<i64>) -> impl Responder {
    aplicar_transicion(path.into_inner(), |estado| estado.aprobar())
}

/// POST /evidencias/{id}/rechazar — el comentario del revisor es obligatorio.
pub async fn rechazar_evidencia_handler(
    path: web::Path<i64>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let rechazo: RechazoInput = match serde_json::from_value(body.into_inner()) {
        Ok(r) => r,
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(json!({"error": format!("no se pudo interpretar el rechazo: {}", e)}));
        }
    };
    aplicar_transicion(path.into_inner(), |estado| estado.rechazar(&rechazo.comentario))
}
