pub mod dependencias;
pub mod compromisos;
pub mod obras;
pub mod kpis;

pub use dependencias::*;
pub use compromisos::*;
pub use obras::*;
pub use kpis::*;
