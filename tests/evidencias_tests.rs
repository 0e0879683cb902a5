use tablero::evidencias::EstadoEvidencia;

#[test]
fn test_flujo_lineal_completo() {
    let pendiente = EstadoEvidencia::Pendiente;
    let enviada = pendiente.enviar().expect("Debe poder enviarse una pendiente");
    assert_eq!(enviada, EstadoEvidencia::Enviada);

    let aprobada = enviada.aprobar().expect("Debe poder aprobarse una enviada");
    assert_eq!(aprobada, EstadoEvidencia::Aprobada);
}

#[test]
fn test_rechazo_requiere_comentario() {
    let enviada = EstadoEvidencia::Enviada;

    // comentario vacío o en blanco: la transición falla y el estado no cambia
    assert!(enviada.rechazar("").is_err());
    assert!(enviada.rechazar("   ").is_err());
    assert_eq!(enviada, EstadoEvidencia::Enviada);

    let rechazada = enviada
        .rechazar("falta el acta de entrega")
        .expect("Debe poder rechazarse con comentario");
    assert_eq!(
        rechazada,
        EstadoEvidencia::Rechazada {
            comentario: "falta el acta de entrega".to_string()
        }
    );
}

#[test]
fn test_reenvio_desde_rechazada() {
    let rechazada = EstadoEvidencia::Rechazada {
        comentario: "foto ilegible".to_string(),
    };
    let reenviada = rechazada.enviar().expect("Debe poder reenviarse una rechazada");
    assert_eq!(reenviada, EstadoEvidencia::Enviada);
}

#[test]
fn test_aprobar_descarta_comentario_previo() {
    let rechazada = EstadoEvidencia::Rechazada {
        comentario: "foto ilegible".to_string(),
    };
    let reenviada = rechazada.enviar().expect("Debe poder reenviarse");
    let aprobada = reenviada.aprobar().expect("Debe poder aprobarse");

    // la variante Aprobada no carga comentario alguno
    assert_eq!(aprobada, EstadoEvidencia::Aprobada);
    let (estado, comentario) = aprobada.a_columnas();
    assert_eq!(estado, "aprobada");
    assert_eq!(comentario, None);
}

#[test]
fn test_transiciones_invalidas() {
    // aprobada es terminal
    assert!(EstadoEvidencia::Aprobada.enviar().is_err());
    assert!(EstadoEvidencia::Aprobada.aprobar().is_err());
    assert!(EstadoEvidencia::Aprobada.rechazar("comentario").is_err());

    // una pendiente no puede aprobarse ni rechazarse sin pasar por enviada
    assert!(EstadoEvidencia::Pendiente.aprobar().is_err());
    assert!(EstadoEvidencia::Pendiente.rechazar("comentario").is_err());

    // una enviada no puede volver a enviarse
    assert!(EstadoEvidencia::Enviada.enviar().is_err());
}

#[test]
fn test_columnas_ida_y_vuelta() {
    let rechazada = EstadoEvidencia::Rechazada {
        comentario: "sin firma".to_string(),
    };
    let (estado, comentario) = rechazada.a_columnas();
    assert_eq!(estado, "rechazada");
    assert_eq!(comentario, Some("sin firma"));

    let reconstruida =
        EstadoEvidencia::desde_columnas(estado, comentario.map(|c| c.to_string()))
            .expect("Debe reconstruirse desde columnas");
    assert_eq!(reconstruida, rechazada);

    assert!(EstadoEvidencia::desde_columnas("archivada", None).is_err());
}

#[test]
fn test_serializacion_etiquetada() {
    let rechazada = EstadoEvidencia::Rechazada {
        comentario: "sin firma".to_string(),
    };
    let valor = serde_json::to_value(&rechazada).expect("Debe serializar");
    assert_eq!(valor["estado"], "rechazada");
    assert_eq!(valor["comentario"], "sin firma");

    let pendiente = serde_json::to_value(&EstadoEvidencia::Pendiente).expect("Debe serializar");
    assert_eq!(pendiente["estado"], "pendiente");
}
