pub mod db;
pub mod queries;
pub mod insertions;

pub use db::init_db;
pub use insertions::{
    actualizar_estado_evidencia, insertar_compromiso, insertar_dependencia, insertar_evidencia,
    insertar_indicador, insertar_meta, insertar_obra, insertar_registro,
};
pub use queries::{
    compromisos_por_dependencia, evidencia_por_id, evidencias_por_obra, existe_compromiso,
    existe_dependencia, existe_obra, indicadores_por_dependencia, indicadores_todos,
    listar_dependencias, listar_obras, registros_por_dependencia, registros_todos,
};
