// errors.rs
use thiserror::Error;

/// Errores del dominio de fechas y ciclos.
///
/// - `ValidationError`: una fecha o etiqueta no cumple el formato requerido.
/// - `ParseError`: un valor crudo no pudo interpretarse.
/// - `CalendarError`: invariante del núcleo de calendario violado (indica un
///   defecto, no un estado de negocio válido).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
  #[error("Error de validación: {0}")]
  ValidationError(String),
  #[error("Error de interpretación: {0}")]
  ParseError(String),
  #[error("Error de calendario: {0}")]
  CalendarError(String),
}
