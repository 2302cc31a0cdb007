// timestamp.rs
// Canonicalizador de marcas de tiempo: convierte cualquier representación
// cruda almacenada en el documento (segundos de época, objeto con `seconds`,
// texto ISO, texto largo en español, o ya canónica) a la cadena `YYYY-MM-DD`.
//
// El desplazamiento UTC se aplica como constante fija de la operación (la
// zona única del negocio), nunca la zona del host: dos representaciones del
// mismo día de calendario deben canonicalizar siempre a la misma cadena.
use crate::canonical_date::fold_accents;
use crate::CanonicalDate;
use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Representación textual de una fecha inutilizable en reportes y salidas.
pub const NO_DISPONIBLE: &str = "N/A";

/// Tabla fija de 12 nombres de mes en español (ya plegados, ver
/// [`fold_accents`]) hacia su número 1..12.
static MESES: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
  HashMap::from([("enero", 1),
                 ("febrero", 2),
                 ("marzo", 3),
                 ("abril", 4),
                 ("mayo", 5),
                 ("junio", 6),
                 ("julio", 7),
                 ("agosto", 8),
                 ("septiembre", 9),
                 ("octubre", 10),
                 ("noviembre", 11),
                 ("diciembre", 12)])
});

/// Unión de las representaciones de fecha que el almacén documental contiene.
/// Entrada de sólo lectura: se consume una vez por llamada a
/// [`canonicalize`] y nunca se muta.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
  /// Texto libre: canónico, ISO con hora, o forma larga en español.
  Text(String),
  /// Segundos de época Unix (número directo u objeto `seconds`/`_seconds`).
  EpochSeconds(i64),
  /// Milisegundos de época (objetos con campo de milisegundos).
  EpochMillis(i64),
  /// Nulo, vacío o de forma desconocida.
  Null,
}

impl RawTimestamp {
  /// Clasifica un valor JSON tal como vive en el documento almacenado.
  pub fn from_json(value: &JsonValue) -> Self {
    match value {
      JsonValue::String(s) => RawTimestamp::Text(s.clone()),
      JsonValue::Number(n) => match number_to_i64(n) {
        Some(secs) => RawTimestamp::EpochSeconds(secs),
        None => RawTimestamp::Null,
      },
      JsonValue::Object(map) => {
        for key in ["seconds", "_seconds"] {
          if let Some(secs) = map.get(key).and_then(|v| v.as_number()).and_then(number_to_i64) {
            return RawTimestamp::EpochSeconds(secs);
          }
        }
        for key in ["milliseconds", "_milliseconds", "millis"] {
          if let Some(ms) = map.get(key).and_then(|v| v.as_number()).and_then(number_to_i64) {
            return RawTimestamp::EpochMillis(ms);
          }
        }
        RawTimestamp::Null
      }
      _ => RawTimestamp::Null,
    }
  }
}

fn number_to_i64(n: &serde_json::Number) -> Option<i64> {
  if let Some(i) = n.as_i64() {
    return Some(i);
  }
  n.as_f64().map(|f| f as i64)
}

/// Convierte una representación cruda a fecha canónica bajo un desplazamiento
/// UTC fijo en horas. `None` significa "no disponible": el llamador decide si
/// eso excluye el registro; esta función es pura y nunca falla con pánico.
///
/// Orden de resolución (gana la primera coincidencia):
/// 1. ya canónica, 2. ISO con hora (10 caracteres iniciales), 3. forma larga
/// en español, 4/5. segundos o milisegundos de época bajo el desplazamiento
/// fijo, 6. cualquier otra cosa → `None`.
pub fn canonicalize(raw: &RawTimestamp, fixed_utc_offset_hours: i32) -> Option<CanonicalDate> {
  match raw {
    RawTimestamp::Text(s) => canonicalize_text(s.trim()),
    RawTimestamp::EpochSeconds(secs) => from_epoch_seconds(*secs, fixed_utc_offset_hours),
    RawTimestamp::EpochMillis(ms) => from_epoch_seconds(ms.div_euclid(1000), fixed_utc_offset_hours),
    RawTimestamp::Null => None,
  }
}

/// Conveniencia: clasifica y canoniza un valor JSON almacenado en un paso.
pub fn canonicalize_json(value: &JsonValue, fixed_utc_offset_hours: i32) -> Option<CanonicalDate> {
  canonicalize(&RawTimestamp::from_json(value), fixed_utc_offset_hours)
}

fn canonicalize_text(s: &str) -> Option<CanonicalDate> {
  if s.is_empty() {
    return None;
  }
  if let Ok(d) = CanonicalDate::parse(s) {
    return Some(d);
  }
  // ISO con hora: los 10 caracteres iniciales deben revalidar como fecha.
  let bytes = s.as_bytes();
  if bytes.len() > 10 && (bytes[10] == b'T' || bytes[10] == b' ') {
    if let Ok(d) = CanonicalDate::parse(&s[..10]) {
      return Some(d);
    }
  }
  parse_spanish_long_form(s)
}

/// Forma larga localizada: `<día> de <mes> de <año>`, p. ej.
/// "12 de enero de 2026". Falla si el nombre de mes no está en la tabla fija.
fn parse_spanish_long_form(s: &str) -> Option<CanonicalDate> {
  let folded = fold_accents(s);
  let parts: Vec<&str> = folded.split(" de ").map(str::trim).collect();
  if parts.len() != 3 {
    return None;
  }
  let day: u32 = parts[0].parse().ok()?;
  let month = *MESES.get(parts[1])?;
  let year: i64 = parts[2].parse().ok()?;
  CanonicalDate::parse(&format!("{:04}-{:02}-{:02}", year, month, day)).ok()
}

/// Instante absoluto → día de calendario bajo el desplazamiento fijo. Se lee
/// año/mes/día del instante desplazado, jamás de la zona local del host.
fn from_epoch_seconds(secs: i64, fixed_utc_offset_hours: i32) -> Option<CanonicalDate> {
  let offset = FixedOffset::east_opt(fixed_utc_offset_hours.checked_mul(3600)?)?;
  let instant = DateTime::from_timestamp(secs, 0)?;
  let local = instant.with_timezone(&offset);
  CanonicalDate::parse(&local.format("%Y-%m-%d").to_string()).ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn canon(v: JsonValue) -> Option<String> {
    canonicalize_json(&v, -6).map(|d| d.to_string())
  }

  #[test]
  fn already_canonical_passes_through() {
    assert_eq!(canon(json!("2026-01-19")), Some("2026-01-19".into()));
  }

  #[test]
  fn iso_with_time_takes_leading_date() {
    assert_eq!(canon(json!("2026-01-19T18:30:00Z")), Some("2026-01-19".into()));
    assert_eq!(canon(json!("2026-01-19 18:30:00")), Some("2026-01-19".into()));
    // Prefijo no fecha: rechazado
    assert_eq!(canon(json!("9999-99-99T00:00:00")), None);
  }

  #[test]
  fn spanish_long_form() {
    assert_eq!(canon(json!("12 de enero de 2026")), Some("2026-01-12".into()));
    assert_eq!(canon(json!("3 de Septiembre de 2025")), Some("2025-09-03".into()));
    // mes fuera de la tabla fija
    assert_eq!(canon(json!("12 de brumario de 2026")), None);
    // día imposible para el mes
    assert_eq!(canon(json!("30 de febrero de 2026")), None);
  }

  #[test]
  fn epoch_representations_agree() {
    // 1768867200 = 2026-01-20T00:00:00Z; con UTC-6 es el 2026-01-19
    let expected = Some("2026-01-19".to_string());
    assert_eq!(canon(json!(1_768_867_200)), expected);
    assert_eq!(canon(json!({ "seconds": 1_768_867_200 })), expected);
    assert_eq!(canon(json!({ "_seconds": 1_768_867_200 })), expected);
    assert_eq!(canon(json!({ "milliseconds": 1_768_867_200_000i64 })), expected);
    assert_eq!(canon(json!("2026-01-19T18:00:00-06:00")), expected);
  }

  #[test]
  fn offset_is_fixed_not_host_local() {
    // El mismo instante con desplazamiento 0 cae en el día siguiente.
    let raw = RawTimestamp::EpochSeconds(1_768_867_200);
    assert_eq!(canonicalize(&raw, 0).unwrap().as_str(), "2026-01-20");
    assert_eq!(canonicalize(&raw, -6).unwrap().as_str(), "2026-01-19");
  }

  #[test]
  fn unusable_shapes_yield_none() {
    assert_eq!(canon(json!(null)), None);
    assert_eq!(canon(json!("")), None);
    assert_eq!(canon(json!("mañana")), None);
    assert_eq!(canon(json!({ "foo": 1 })), None);
    assert_eq!(canon(json!([1768867200])), None);
    assert_eq!(canon(json!(true)), None);
  }

  #[test]
  fn float_seconds_truncate() {
    assert_eq!(canon(json!(1_768_867_200.9)), Some("2026-01-19".into()));
  }
}
