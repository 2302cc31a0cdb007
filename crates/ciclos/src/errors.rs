// Archivo: errors.rs
// Propósito: definir los errores de la capa de motor/lotes y el alias
// Result<T> usado por las APIs del crate. Mensajes en español.
use envio_domain::DomainError;
use thiserror::Error;

/// Errores comunes de la capa de ciclos y lotes.
///
/// - `NotFound`: registro no encontrado en el almacén.
/// - `Storage`: error al acceder al colaborador de persistencia.
/// - `Domain`: error del dominio de fechas (envuelve `DomainError`).
/// - `Other`: cualquier otro error.
#[derive(Error, Debug)]
pub enum CicloError {
  /// Registro no encontrado (por ejemplo, pedido inexistente).
  #[error("No encontrado: {0}")]
  NotFound(String),
  /// Error genérico de almacenamiento externo.
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  /// Error del dominio de fechas/ciclos.
  #[error("Error de dominio: {0}")]
  Domain(#[from] DomainError),
  /// Otro tipo de error.
  #[error("Otro: {0}")]
  Other(String),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, CicloError>;
