use tablero::motor::*;

#[test]
fn test_porcentaje_avance_denominador_cero() {
    // modificado == 0 devuelve 0, nunca NaN ni infinito
    assert_eq!(porcentaje_avance(0.0, 0.0), 0.0);
    assert_eq!(porcentaje_avance(500.0, 0.0), 0.0);
}

#[test]
fn test_porcentaje_avance_sin_recorte() {
    assert_eq!(porcentaje_avance(50.0, 100.0), 50.0);
    // el valor canónico supera 100; recortar es asunto de presentación
    assert_eq!(porcentaje_avance(150.0, 100.0), 150.0);
}

#[test]
fn test_porcentaje_avance_entradas_malformadas() {
    assert_eq!(porcentaje_avance(-50.0, 100.0), 0.0);
    assert_eq!(porcentaje_avance(f64::NAN, 100.0), 0.0);
    assert_eq!(porcentaje_avance(50.0, f64::NAN), 0.0);
    assert_eq!(porcentaje_avance(50.0, -100.0), 0.0);
    assert!(porcentaje_avance(f64::INFINITY, 100.0).is_finite());
}

#[test]
fn test_razon_cumplimiento() {
    assert_eq!(razon_cumplimiento(80.0, 100.0), 80.0);
    assert_eq!(razon_cumplimiento(10.0, 0.0), 0.0);
    assert_eq!(razon_cumplimiento(120.0, 100.0), 120.0);
}

#[test]
fn test_semaforo_presupuesto_corte_superior_estricto() {
    // el corte superior es > (no >=): 66.6 exacto NO es verde
    assert_ne!(clasificar_presupuesto(66.6), Semaforo::Verde);
    assert_eq!(clasificar_presupuesto(66.6), Semaforo::Amarillo);
    assert_eq!(clasificar_presupuesto(66.7), Semaforo::Verde);
}

#[test]
fn test_semaforo_presupuesto_corte_inferior_inclusivo() {
    // el corte inferior es >=: 33.3 exacto es amarillo
    assert_eq!(clasificar_presupuesto(33.3), Semaforo::Amarillo);
    assert_eq!(clasificar_presupuesto(33.29), Semaforo::Rojo);
    assert_eq!(clasificar_presupuesto(0.0), Semaforo::Rojo);
    assert_eq!(clasificar_presupuesto(100.0), Semaforo::Verde);
}

#[test]
fn test_semaforo_cumplimiento_cortes() {
    // política distinta a la presupuestal: 67/34, ambos inclusivos
    assert_eq!(clasificar_cumplimiento(67.0), Semaforo::Verde);
    assert_eq!(clasificar_cumplimiento(66.99), Semaforo::Amarillo);
    assert_eq!(clasificar_cumplimiento(34.0), Semaforo::Amarillo);
    assert_eq!(clasificar_cumplimiento(33.99), Semaforo::Rojo);
}

#[test]
fn test_politicas_no_unificadas() {
    // 66.7 es verde para presupuesto pero amarillo para cumplimiento
    assert_eq!(clasificar_presupuesto(66.7), Semaforo::Verde);
    assert_eq!(clasificar_cumplimiento(66.7), Semaforo::Amarillo);
    // 33.5 es amarillo para presupuesto pero rojo para cumplimiento
    assert_eq!(clasificar_presupuesto(33.5), Semaforo::Amarillo);
    assert_eq!(clasificar_cumplimiento(33.5), Semaforo::Rojo);
}

#[test]
fn test_meta_cumplida_es_politica_estricta() {
    assert!(meta_cumplida(100.0));
    assert!(meta_cumplida(120.0));
    // aceptable (verde) no implica cumplida
    assert!(!meta_cumplida(99.9));
    assert_eq!(clasificar_cumplimiento(99.9), Semaforo::Verde);
}

#[test]
fn test_indice_global_lista_vacia() {
    // rama explícita: sin elementos el índice es 0, nunca NaN
    let indice = indice_global(&[]);
    assert_eq!(indice, 0.0);
    assert!(!indice.is_nan());
}

#[test]
fn test_indice_global_es_promedio() {
    assert_eq!(indice_global(&[100.0, 0.0]), 50.0);
    assert_eq!(indice_global(&[50.0, 50.0, 50.0]), 50.0);
}

#[test]
fn test_promedio_y_razon_de_sumas_divergen() {
    // dos partidas de tamaño distinto: 100% de 10 y 0% de 990
    let pares = [(10.0, 10.0), (0.0, 990.0)];
    let porcentajes: Vec<f64> = pares.iter().map(|&(p, m)| porcentaje_avance(p, m)).collect();
    assert_eq!(indice_global(&porcentajes), 50.0);
    assert_eq!(porcentaje_de_sumas(&pares), 1.0);
}

#[test]
fn test_porcentaje_de_sumas_denominador_cero() {
    assert_eq!(porcentaje_de_sumas(&[]), 0.0);
    assert_eq!(porcentaje_de_sumas(&[(10.0, 0.0), (5.0, 0.0)]), 0.0);
}

#[test]
fn test_exceso_presupuestal() {
    let con_exceso = exceso_presupuestal(120.0, 100.0);
    assert!(con_exceso.hay_exceso);
    assert_eq!(con_exceso.monto, 20.0);

    let sin_exceso = exceso_presupuestal(80.0, 100.0);
    assert!(!sin_exceso.hay_exceso);
    assert_eq!(sin_exceso.monto, 0.0);

    // igualdad exacta no es exceso
    let exacto = exceso_presupuestal(100.0, 100.0);
    assert!(!exacto.hay_exceso);
    assert_eq!(exacto.monto, 0.0);
}

#[test]
fn test_variacion_modificado() {
    assert_eq!(variacion_modificado(100.0, 80.0), -20.0);
    assert_eq!(variacion_modificado(100.0, 120.0), 20.0);
}

#[test]
fn test_formato_tamano_archivo() {
    assert_eq!(formato_tamano_archivo(0.0), "0 Bytes");
    assert_eq!(formato_tamano_archivo(512.0), "512 Bytes");
    assert_eq!(formato_tamano_archivo(1024.0), "1 KB");
    assert_eq!(formato_tamano_archivo(1536.0), "1.5 KB");
    assert_eq!(formato_tamano_archivo(1048576.0), "1 MB");
    assert_eq!(formato_tamano_archivo(1073741824.0), "1 GB");
}

#[test]
fn test_formato_moneda_mxn() {
    assert_eq!(formato_moneda_mxn(0.0), "$0.00");
    assert_eq!(formato_moneda_mxn(1234567.891), "$1,234,567.89");
    assert_eq!(formato_moneda_mxn(999.5), "$999.50");
    // malformado degrada a cero
    assert_eq!(formato_moneda_mxn(f64::NAN), "$0.00");
    assert_eq!(formato_moneda_mxn(-100.0), "$0.00");
}

#[test]
fn test_parsear_o_cero() {
    assert_eq!(parsear_o_cero("1234.5"), 1234.5);
    assert_eq!(parsear_o_cero("1234,5"), 1234.5);
    assert_eq!(parsear_o_cero("  42  "), 42.0);
    assert_eq!(parsear_o_cero(""), 0.0);
    assert_eq!(parsear_o_cero("no es numero"), 0.0);
    // negativos también colapsan a 0
    assert_eq!(parsear_o_cero("-17.5"), 0.0);
}

#[test]
fn test_normalizar() {
    assert_eq!(normalizar(5.0), 5.0);
    assert_eq!(normalizar(-5.0), 0.0);
    assert_eq!(normalizar(f64::NAN), 0.0);
    assert_eq!(normalizar(f64::INFINITY), 0.0);
    assert_eq!(normalizar(f64::NEG_INFINITY), 0.0);
}
