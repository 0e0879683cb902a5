use serde::Serialize;

use crate::motor::porcentajes::normalizar;

/// Resultado de comparar pagado contra modificado. `pagado > modificado` es
/// un estado válido que se marca, no un error: el flujo de captura exige una
/// justificación antes de aceptar el registro (ver `api_json::validar_registro`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExcesoPresupuestal {
    pub hay_exceso: bool,
    pub monto: f64,
}

pub fn exceso_presupuestal(pagado: f64, modificado: f64) -> ExcesoPresupuestal {
    let pagado = normalizar(pagado);
    let modificado = normalizar(modificado);
    ExcesoPresupuestal {
        hay_exceso: pagado > modificado,
        monto: (pagado - modificado).max(0.0),
    }
}

/// Variación del modificado respecto al aprobado (negativa cuando hubo
/// recorte). Se expone para mostrarla en el tablero; un recorte NO dispara
/// el flujo de justificación, sólo el exceso de pagado lo hace.
pub fn variacion_modificado(aprobado: f64, modificado: f64) -> f64 {
    normalizar(modificado) - normalizar(aprobado)
}

/// Índice global como media aritmética de porcentajes por elemento (ICD
/// global, IAOP global). Una lista vacía devuelve 0: la división por
/// `len()` sin guarda produciría NaN y aquí es una rama explícita.
pub fn indice_global(porcentajes: &[f64]) -> f64 {
    if porcentajes.is_empty() {
        return 0.0;
    }
    let suma: f64 = porcentajes.iter().map(|&p| normalizar(p)).sum();
    suma / porcentajes.len() as f64
}

/// Porcentaje de sumas: `Σ numeradores / Σ denominadores * 100`, con la
/// misma guarda de denominador cero. Es la agregación para totales de
/// dinero y NO es intercambiable con `indice_global`: promediar porcentajes
/// y calcular el porcentaje de las sumas dan números distintos cuando los
/// elementos tienen tamaños distintos.
pub fn porcentaje_de_sumas(pares: &[(f64, f64)]) -> f64 {
    let numerador: f64 = pares.iter().map(|&(n, _)| normalizar(n)).sum();
    let denominador: f64 = pares.iter().map(|&(_, d)| normalizar(d)).sum();
    if denominador == 0.0 {
        return 0.0;
    }
    numerador / denominador * 100.0
}
