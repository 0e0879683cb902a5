use serde::{Deserialize, Serialize};

use crate::motor::porcentajes::normalizar;

/// Clasificación semáforo usada por todos los módulos del tablero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semaforo {
    Rojo,
    Amarillo,
    Verde,
}

/// Política de ejecución presupuestal: Verde si pct > 66.6, Amarillo si
/// pct >= 33.3, Rojo en otro caso.
///
/// La asimetría de los cortes (`>` en el superior, `>=` en el inferior) es
/// parte del contrato: 66.6 exacto es Amarillo, 33.3 exacto es Amarillo.
pub fn clasificar_presupuesto(pct: f64) -> Semaforo {
    let pct = normalizar(pct);
    if pct > 66.6 {
        Semaforo::Verde
    } else if pct >= 33.3 {
        Semaforo::Amarillo
    } else {
        Semaforo::Rojo
    }
}

/// Política de cumplimiento de indicadores: Verde si pct >= 67, Amarillo si
/// pct >= 34, Rojo en otro caso.
///
/// Los cortes son distintos a los de `clasificar_presupuesto` (67/34 contra
/// 66.6/33.3, ambos inclusivos aquí). Los consumidores dependen de los
/// valores exactos de cada política; no unificar.
pub fn clasificar_cumplimiento(pct: f64) -> Semaforo {
    let pct = normalizar(pct);
    if pct >= 67.0 {
        Semaforo::Verde
    } else if pct >= 34.0 {
        Semaforo::Amarillo
    } else {
        Semaforo::Rojo
    }
}

/// Variante estricta: ¿la meta está literalmente cumplida (pct >= 100)?
/// Responde una pregunta distinta a `clasificar_cumplimiento` ("¿es
/// aceptable?") y se mantiene como política separada.
pub fn meta_cumplida(pct: f64) -> bool {
    normalizar(pct) >= 100.0
}
