//! Crate `ciclos` — motor de ventanas de ciclo y lotes de corrección
//!
//! Este crate define el contrato con el colaborador externo de persistencia
//! (`OrderStore`), el motor `CycleEngine` (consultas de empaque/envío/pagos y
//! lotes de migración/conciliación), la capa orquestadora `CycleService` y
//! una implementación en memoria útil para pruebas (`InMemoryOrderStore`).
//!
//! Diseño resumido:
//! - "Hoy" siempre llega ya canonizado por el llamador; el motor no consulta
//!   relojes ni zonas del host.
//! - Idempotencia: re-ejecutar migración o conciliación sobre los mismos
//!   registros no produce correcciones adicionales.
//! - Fallo parcial: una escritura fallida se cuenta en el reporte y el lote
//!   continúa con los registros restantes.
//!
//! Ejemplo rápido:
//! ```rust
//! use ciclos::{CycleEngine, EngineConfig, InMemoryOrderStore};
//! use std::sync::Arc;
//! let store = Arc::new(InMemoryOrderStore::new());
//! let engine = CycleEngine::new(store, EngineConfig::default());
//! ```
pub mod engine;
pub mod errors;
pub mod repository;
pub mod service;
pub mod stubs;

pub use engine::*;
pub use errors::*;
pub use repository::*;
pub use service::*;
pub use stubs::*;
