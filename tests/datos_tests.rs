use std::sync::Once;

use tablero::api_json::EvidenciaInput;
use tablero::datos::{
    actualizar_estado_evidencia, evidencia_por_id, existe_compromiso, existe_dependencia,
    existe_obra, init_db, insertar_dependencia, insertar_evidencia, insertar_obra,
};
use tablero::evidencias::EstadoEvidencia;

static INIT: Once = Once::new();

// Apunta el almacén a un archivo sqlite temporal y crea las tablas una sola
// vez por binario de prueba.
fn prepara_bd() {
    INIT.call_once(|| {
        let dir = std::env::temp_dir().join(format!("tablero_pruebas_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Debe crearse el directorio temporal");
        let ruta = dir.join("tablero.db");
        unsafe {
            std::env::set_var("TABLERO_DB_PATH", &ruta);
        }
        init_db().expect("Debe inicializarse la base de prueba");
    });
}

fn evidencia_de_prueba(nombre: &str) -> i64 {
    let dependencia_id =
        insertar_dependencia("Secretaría de Pruebas", Some("SP")).expect("Debe insertar");
    let obra_id =
        insertar_obra("Obra de prueba", dependencia_id, Some("Pachuca")).expect("Debe insertar");
    let input = EvidenciaInput {
        nombre_archivo: nombre.to_string(),
        tamano_bytes: 2048.0,
    };
    insertar_evidencia(obra_id, &input).expect("Debe insertar la evidencia")
}

#[test]
fn test_evidencia_nace_pendiente_y_persiste_transiciones() {
    prepara_bd();
    let id = evidencia_de_prueba("acta_entrega.pdf");

    let guardada = evidencia_por_id(id)
        .expect("Debe consultar")
        .expect("Debe existir la evidencia recién insertada");
    assert_eq!(guardada.estado, EstadoEvidencia::Pendiente);

    let enviada = guardada.estado.enviar().expect("Debe poder enviarse");
    let aplicada = actualizar_estado_evidencia(id, &enviada, &guardada.estado)
        .expect("Debe actualizar");
    assert!(aplicada);

    let guardada = evidencia_por_id(id).expect("Debe consultar").expect("Debe existir");
    assert_eq!(guardada.estado, EstadoEvidencia::Enviada);
}

#[test]
fn test_escritura_obsoleta_no_pisa_un_estado_terminal() {
    prepara_bd();
    let id = evidencia_de_prueba("fachada_norte.jpg");

    let pendiente = evidencia_por_id(id).expect("Debe consultar").expect("Debe existir");
    let enviada = pendiente.estado.enviar().expect("Debe poder enviarse");
    assert!(actualizar_estado_evidencia(id, &enviada, &pendiente.estado).expect("Debe actualizar"));

    // dos revisores leen la misma evidencia enviada
    let leida_a = evidencia_por_id(id).expect("Debe consultar").expect("Debe existir");
    let leida_b = leida_a.clone();

    // el primero la aprueba; el estado almacenado queda terminal
    let aprobada = leida_a.estado.aprobar().expect("Debe poder aprobarse");
    assert!(actualizar_estado_evidencia(id, &aprobada, &leida_a.estado).expect("Debe actualizar"));

    // el segundo calculó un rechazo sobre la lectura vieja: la escritura
    // condicional no aplica y devuelve false
    let rechazada = leida_b.estado.rechazar("falta el acta").expect("Debe poder rechazarse");
    let aplicada = actualizar_estado_evidencia(id, &rechazada, &leida_b.estado)
        .expect("Debe ejecutar la actualización");
    assert!(!aplicada, "una escritura obsoleta no debe aplicar");

    // el estado almacenado sigue siendo el terminal
    let final_ = evidencia_por_id(id).expect("Debe consultar").expect("Debe existir");
    assert_eq!(final_.estado, EstadoEvidencia::Aprobada);
}

#[test]
fn test_estado_esperado_equivocado_no_aplica() {
    prepara_bd();
    let id = evidencia_de_prueba("plano_hidraulico.dwg");

    // la evidencia está pendiente; una escritura que espera enviada no aplica
    let aplicada = actualizar_estado_evidencia(
        id,
        &EstadoEvidencia::Aprobada,
        &EstadoEvidencia::Enviada,
    )
    .expect("Debe ejecutar la actualización");
    assert!(!aplicada);

    let guardada = evidencia_por_id(id).expect("Debe consultar").expect("Debe existir");
    assert_eq!(guardada.estado, EstadoEvidencia::Pendiente);
}

#[test]
fn test_actualizar_evidencia_inexistente_devuelve_false() {
    prepara_bd();
    let aplicada = actualizar_estado_evidencia(
        999_999,
        &EstadoEvidencia::Enviada,
        &EstadoEvidencia::Pendiente,
    )
    .expect("Debe ejecutar la actualización");
    assert!(!aplicada);
}

#[test]
fn test_verificacion_de_existencia() {
    prepara_bd();

    assert!(!existe_dependencia(888_888).expect("Debe consultar"));
    assert!(!existe_obra(888_888).expect("Debe consultar"));
    assert!(!existe_compromiso(888_888).expect("Debe consultar"));

    let dependencia_id =
        insertar_dependencia("Secretaría de Obras", Some("SO")).expect("Debe insertar");
    assert!(existe_dependencia(dependencia_id).expect("Debe consultar"));

    let obra_id =
        insertar_obra("Rehabilitación de camino", dependencia_id, None).expect("Debe insertar");
    assert!(existe_obra(obra_id).expect("Debe consultar"));
}
