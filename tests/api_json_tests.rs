use tablero::api_json::*;

#[test]
fn test_parse_registro_completo() {
    let json_data = r#"
    {
        "dependencia_id": 3,
        "anio": 2025,
        "trimestre": 2,
        "aprobado": 1500000,
        "modificado": "1450000.50",
        "pagado": "980000,25",
        "justificacion_exceso": null
    }
    "#;

    let input = parse_registro(json_data).expect("Debe parsear el registro completo");
    assert_eq!(input.dependencia_id, 3);
    assert_eq!(input.anio, 2025);
    assert_eq!(input.trimestre, Some(2));
    assert_eq!(input.aprobado, 1500000.0);
    assert_eq!(input.modificado, 1450000.50);
    // coma decimal aceptada en cifras capturadas como cadena
    assert_eq!(input.pagado, 980000.25);
    assert_eq!(input.justificacion_exceso, None);
}

#[test]
fn test_parse_registro_cifras_faltantes_valen_cero() {
    let json_data = r#"{ "dependencia_id": 1, "anio": 2025 }"#;
    let input = parse_registro(json_data).expect("Debe parsear sin cifras");
    assert_eq!(input.aprobado, 0.0);
    assert_eq!(input.modificado, 0.0);
    assert_eq!(input.pagado, 0.0);
    assert_eq!(input.trimestre, None);
}

#[test]
fn test_parse_registro_cifras_malformadas_valen_cero() {
    // parse-or-zero: texto no numérico, negativos y null degradan a 0
    // sin convertirse en error HTTP
    let json_data = r#"
    {
        "dependencia_id": 1,
        "anio": 2025,
        "aprobado": "no aplica",
        "modificado": -250000,
        "pagado": null
    }
    "#;
    let input = parse_registro(json_data).expect("Debe parsear con degradación a cero");
    assert_eq!(input.aprobado, 0.0);
    assert_eq!(input.modificado, 0.0);
    assert_eq!(input.pagado, 0.0);
}

#[test]
fn test_validar_exceso_sin_justificacion_bloquea() {
    let json_data = r#"
    {
        "dependencia_id": 1,
        "anio": 2025,
        "aprobado": 100000,
        "modificado": 100000,
        "pagado": 120000
    }
    "#;
    let input = parse_registro(json_data).expect("Debe parsear");
    let resultado = validar_registro(&input);
    assert!(resultado.is_err(), "un exceso sin justificación debe bloquearse");
    let mensaje = format!("{}", resultado.unwrap_err());
    assert!(mensaje.contains("justificación"), "mensaje inesperado: {}", mensaje);
}

#[test]
fn test_validar_exceso_con_justificacion_en_blanco_bloquea() {
    let json_data = r#"
    {
        "dependencia_id": 1,
        "anio": 2025,
        "aprobado": 100000,
        "modificado": 100000,
        "pagado": 120000,
        "justificacion_exceso": "   "
    }
    "#;
    let input = parse_registro(json_data).expect("Debe parsear");
    assert!(validar_registro(&input).is_err());
}

#[test]
fn test_validar_exceso_con_justificacion_pasa() {
    let json_data = r#"
    {
        "dependencia_id": 1,
        "anio": 2025,
        "aprobado": 100000,
        "modificado": 100000,
        "pagado": 120000,
        "justificacion_exceso": "ampliación autorizada por oficio 123/2025"
    }
    "#;
    let input = parse_registro(json_data).expect("Debe parsear");
    assert!(validar_registro(&input).is_ok());
}

#[test]
fn test_validar_sin_exceso_no_pide_justificacion() {
    let json_data = r#"
    {
        "dependencia_id": 1,
        "anio": 2025,
        "aprobado": 100000,
        "modificado": 100000,
        "pagado": 80000
    }
    "#;
    let input = parse_registro(json_data).expect("Debe parsear");
    assert!(validar_registro(&input).is_ok());
}

#[test]
fn test_recorte_del_modificado_no_bloquea() {
    // modificado < aprobado es una variación visible en el tablero, pero
    // no dispara el flujo de justificación
    let json_data = r#"
    {
        "dependencia_id": 1,
        "anio": 2025,
        "aprobado": 100000,
        "modificado": 60000,
        "pagado": 50000
    }
    "#;
    let input = parse_registro(json_data).expect("Debe parsear");
    assert!(validar_registro(&input).is_ok());
}

#[test]
fn test_parse_rechazo_con_comentario_ausente() {
    let rechazo: RechazoInput =
        serde_json::from_str(r#"{}"#).expect("Debe parsear rechazo vacío");
    assert_eq!(rechazo.comentario, "");
}
