// Ayudantes de formato para montos y tamaños de archivo.

use crate::motor::porcentajes::normalizar;

fn agrupar_miles(n: u64) -> String {
    let digitos = n.to_string();
    let mut salida = String::with_capacity(digitos.len() + digitos.len() / 3);
    for (i, c) in digitos.chars().enumerate() {
        if i > 0 && (digitos.len() - i) % 3 == 0 {
            salida.push(',');
        }
        salida.push(c);
    }
    salida
}

/// Formatea un monto en pesos mexicanos: `formato_moneda_mxn(1234567.891)`
/// produce `"$1,234,567.89"`. Entradas malformadas valen `"$0.00"`.
pub fn formato_moneda_mxn(monto: f64) -> String {
    let centavos_totales = (normalizar(monto) * 100.0).round() as u64;
    let entero = centavos_totales / 100;
    let centavos = centavos_totales % 100;
    format!("${}.{:02}", agrupar_miles(entero), centavos)
}

const UNIDADES: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formatea un tamaño en bytes con base 1024 y unidades Bytes/KB/MB/GB.
/// Hasta dos decimales, sin ceros finales: 0 -> "0 Bytes", 1536 -> "1.5 KB",
/// 1048576 -> "1 MB".
pub fn formato_tamano_archivo(bytes: f64) -> String {
    let bytes = normalizar(bytes);
    if bytes == 0.0 {
        return "0 Bytes".to_string();
    }
    let k = 1024.0_f64;
    let mut indice = (bytes.ln() / k.ln()).floor() as usize;
    if indice >= UNIDADES.len() {
        indice = UNIDADES.len() - 1;
    }
    let valor = bytes / k.powi(indice as i32);
    let mut texto = format!("{:.2}", valor);
    while texto.ends_with('0') {
        texto.pop();
    }
    if texto.ends_with('.') {
        texto.pop();
    }
    format!("{} {}", texto, UNIDADES[indice])
}
