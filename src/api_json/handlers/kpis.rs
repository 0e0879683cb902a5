use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::collections::HashMap;

use crate::api_json::handlers::dependencias::filtros_periodo;
use crate::motor::{
    clasificar_cumplimiento, clasificar_presupuesto, formato_moneda_mxn, indice_global,
    porcentaje_de_sumas, razon_cumplimiento,
};

/// GET /kpis/global?anio&trimestre
///
/// Calcula los KPI del tablero una vez que todas las lecturas del periodo
/// están disponibles:
/// - ICD global: promedio de los porcentajes de cumplimiento por indicador.
/// - IAOP global: promedio del avance por compromiso (cada compromiso
///   promedia sus metas).
/// - Avance financiero: porcentaje de las sumas (Σ pagado / Σ modificado),
///   que NO coincide con el promedio de porcentajes cuando las dependencias
///   manejan montos distintos.
pub async fn kpis_global_handler(query: web::Query<HashMap<String, String>>) -> impl Responder {
    let (anio, trimestre) = filtros_periodo(&query.into_inner());

    let indicadores = match crate::datos::indicadores_todos(anio, trimestre) {
        Ok(v) => v,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudieron cargar los indicadores: {}", e)}));
        }
    };
    let compromisos = match crate::datos::compromisos_por_dependencia(None, anio, trimestre) {
        Ok(v) => v,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudieron cargar los compromisos: {}", e)}));
        }
    };
    let registros = match crate::datos::registros_todos(anio, trimestre) {
        Ok(v) => v,
        Err(e) => {
            return HttpResponse::InternalServerError()
                .json(json!({"error": format!("no se pudo cargar el presupuesto: {}", e)}));
        }
    };

    let cumplimientos: Vec<f64> = indicadores
        .iter()
        .map(|i| razon_cumplimiento(i.avance, i.meta))
        .collect();
    let icd_global = indice_global(&cumplimientos);

    let avances_compromiso: Vec<f64> = compromisos
        .iter()
        .map(|c| {
            let porcentajes: Vec<f64> = c
                .metas
                .iter()
                .map(|m| razon_cumplimiento(m.avance, m.meta))
                .collect();
            indice_global(&porcentajes)
        })
        .collect();
    let iaop_global = indice_global(&avances_compromiso);

    let pares: Vec<(f64, f64)> = registros.iter().map(|r| (r.pagado, r.modificado)).collect();
    let avance_financiero = porcentaje_de_sumas(&pares);
    let total_pagado: f64 = pares.iter().map(|(p, _)| p).sum();
    let total_modificado: f64 = pares.iter().map(|(_, m)| m).sum();

    HttpResponse::Ok().json(json!({
        "anio": anio,
        "trimestre": trimestre,
        "icd_global": icd_global,
        "icd_semaforo": clasificar_cumplimiento(icd_global),
        "iaop_global": iaop_global,
        "iaop_semaforo": clasificar_cumplimiento(iaop_global),
        "avance_financiero": avance_financiero,
        "avance_financiero_semaforo": clasificar_presupuesto(avance_financiero),
        "total_pagado": formato_moneda_mxn(total_pagado),
        "total_modificado": formato_moneda_mxn(total_modificado),
        "indicadores_contados": indicadores.len(),
        "compromisos_contados": compromisos.len(),
    }))
}
