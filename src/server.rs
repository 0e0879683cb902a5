use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use serde_json::json;

use crate::api_json::handlers::{
    aprobar_evidencia_handler, compromisos_handler, crear_compromiso_handler,
    crear_dependencia_handler, crear_evidencia_handler, crear_indicador_handler,
    crear_meta_handler, crear_obra_handler, crear_registro_handler, enviar_evidencia_handler,
    evidencias_handler, indicadores_handler, kpis_global_handler, listar_dependencias_handler,
    listar_obras_handler, presupuesto_handler, rechazar_evidencia_handler,
};

pub async fn run_server(bind_addr: &str) -> std::io::Result<()> {
    HttpServer::new(|| {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .route("/dependencias", web::get().to(listar_dependencias_handler))
            .route("/dependencias", web::post().to(crear_dependencia_handler))
            .route("/dependencias/{id}/presupuesto", web::get().to(presupuesto_handler))
            .route("/dependencias/{id}/indicadores", web::get().to(indicadores_handler))
            .route("/dependencias/{id}/compromisos", web::get().to(compromisos_handler))
            .route("/presupuesto", web::post().to(crear_registro_handler))
            .route("/indicadores", web::post().to(crear_indicador_handler))
            .route("/compromisos", web::post().to(crear_compromiso_handler))
            .route("/compromisos/{id}/metas", web::post().to(crear_meta_handler))
            .route("/kpis/global", web::get().to(kpis_global_handler))
            .route("/obras", web::get().to(listar_obras_handler))
            .route("/obras", web::post().to(crear_obra_handler))
            .route("/obras/{id}/evidencias", web::get().to(evidencias_handler))
            .route("/obras/{id}/evidencias", web::post().to(crear_evidencia_handler))
            .route("/evidencias/{id}/enviar", web::post().to(enviar_evidencia_handler))
            .route("/evidencias/{id}/aprobar", web::post().to(aprobar_evidencia_handler))
            .route("/evidencias/{id}/rechazar", web::post().to(rechazar_evidencia_handler))
            .route("/help", web::get().to(help_handler))
    })
    .bind(bind_addr)?
    .run()
    .await
}

async fn help_handler() -> impl Responder {
    // Ejemplo de captura presupuestal para POST /presupuesto
    let ejemplo_registro = json!({
        "dependencia_id": 3,
        "anio": 2025,
        "trimestre": 2,
        "aprobado": 1500000,
        "modificado": "1450000.50",
        "pagado": "980000,25",
        "justificacion_exceso": null
    });

    let help = json!({
        "description": "API del tablero de reportes gubernamentales. Las lecturas por dependencia aceptan los filtros opcionales ?anio= y ?trimestre=. Los campos numéricos de captura aceptan número o cadena (punto o coma decimal) y degradan a 0 si no parsean. Un registro con pagado > modificado exige justificacion_exceso.",
        "post_presupuesto_example": ejemplo_registro,
        "get_examples": [
            "/dependencias/3/presupuesto?anio=2025&trimestre=2",
            "/dependencias/3/indicadores?anio=2025",
            "/dependencias/3/compromisos",
            "/kpis/global?anio=2025",
            "/obras?dependencia_id=3",
            "/obras/7/evidencias"
        ],
        "evidencias": {
            "flujo": "pendiente -> enviada -> aprobada | rechazada; una rechazada puede reenviarse",
            "nota": "POST /evidencias/{id}/rechazar requiere {\"comentario\": \"...\"} no vacío"
        },
        "semaforos": {
            "presupuesto": "verde si pct > 66.6, amarillo si pct >= 33.3, rojo en otro caso",
            "cumplimiento": "verde si pct >= 67, amarillo si pct >= 34, rojo en otro caso"
        }
    });

    HttpResponse::Ok().json(help)
}
