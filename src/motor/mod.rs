// Motor de semáforos y agregados: las reglas compartidas que convierten
// cifras crudas (presupuesto aprobado/modificado/pagado, metas y avances de
// indicadores) en clasificaciones, porcentajes y KPI globales. Todas las
// funciones son puras y totales: entradas malformadas (negativos, NaN)
// degradan a 0 y nunca se propaga un NaN o infinito al consumidor.
pub mod porcentajes;
pub mod semaforo;
pub mod agregados;
pub mod formato;

pub use porcentajes::{normalizar, parsear_o_cero, porcentaje_avance, razon_cumplimiento};
pub use semaforo::{Semaforo, clasificar_presupuesto, clasificar_cumplimiento, meta_cumplida};
pub use agregados::{ExcesoPresupuestal, exceso_presupuestal, indice_global, porcentaje_de_sumas, variacion_modificado};
pub use formato::{formato_moneda_mxn, formato_tamano_archivo};
