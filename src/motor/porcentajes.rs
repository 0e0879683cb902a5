// Derivación de porcentajes con guardas explícitas de denominador cero.

/// Normaliza una entrada numérica: NaN, infinitos y negativos se tratan
/// como 0. Es la política global del motor para entradas malformadas.
pub fn normalizar(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 { x } else { 0.0 }
}

/// Semántica "parse-or-zero" de los formularios: una cadena que no parsea
/// como número vale 0. Acepta coma decimal ("1234,5") además de punto.
pub fn parsear_o_cero(texto: &str) -> f64 {
    let limpio = texto.trim().replace(',', ".");
    normalizar(limpio.parse::<f64>().unwrap_or(0.0))
}

/// Porcentaje de avance presupuestal: `pagado / modificado * 100`.
///
/// El resultado NO se recorta a 100: un pagado mayor al modificado produce
/// un porcentaje mayor a 100 y ese es el valor canónico (recortarlo es un
/// asunto de presentación). Con `modificado == 0` devuelve 0, nunca
/// NaN ni infinito.
pub fn porcentaje_avance(pagado: f64, modificado: f64) -> f64 {
    let pagado = normalizar(pagado);
    let modificado = normalizar(modificado);
    if modificado == 0.0 {
        return 0.0;
    }
    pagado / modificado * 100.0
}

/// Razón de cumplimiento de un indicador: `avance / meta * 100`.
/// Mismo contrato que `porcentaje_avance` (sin recorte, guarda de cero).
pub fn razon_cumplimiento(avance: f64, meta: f64) -> f64 {
    let avance = normalizar(avance);
    let meta = normalizar(meta);
    if meta == 0.0 {
        return 0.0;
    }
    avance / meta * 100.0
}
