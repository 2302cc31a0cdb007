// canonical_date.rs
use crate::calendar;
use crate::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fecha canónica: cadena validada `YYYY-MM-DD`, un día de calendario sin
/// hora ni zona horaria.
///
/// El orden lexicográfico de la cadena coincide con el orden cronológico para
/// este formato, por lo que `Ord` deriva directamente del `String` interno y
/// las comparaciones de ventanas pueden hacerse sobre las cadenas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalDate(String);

impl CanonicalDate {
  /// Valida y construye una fecha canónica. Rechaza cualquier cadena que no
  /// sea un día de calendario real en formato estricto `YYYY-MM-DD`.
  pub fn parse(s: &str) -> Result<Self, DomainError> {
    if calendar::to_julian_day(s) == calendar::JD_INVALID {
      return Err(DomainError::ValidationError(format!("Fecha no canónica: '{}'", s)));
    }
    Ok(Self(s.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn julian_day(&self) -> i64 {
    calendar::to_julian_day(&self.0)
  }

  /// Día de la semana, total para toda fecha ya validada.
  pub fn weekday(&self) -> Weekday {
    Weekday::from_index(((self.julian_day() + 1).rem_euclid(7)) as u8)
  }

  /// Suma `n` días (negativo permitido). Total: el valor ya está validado y
  /// el viaje por día juliano siempre produce una fecha canónica.
  pub fn add_days(&self, n: i64) -> CanonicalDate {
    CanonicalDate(calendar::from_julian_day(self.julian_day() + n))
  }
}

impl fmt::Display for CanonicalDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Serialize for CanonicalDate {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for CanonicalDate {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    CanonicalDate::parse(&s).map_err(serde::de::Error::custom)
  }
}

/// Día de la semana, 0 = domingo .. 6 = sábado, derivado determinísticamente
/// del día juliano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
  Domingo,
  Lunes,
  Martes,
  Miercoles,
  Jueves,
  Viernes,
  Sabado,
}

/// Tabla fija de nombres de día, indexada por `Weekday::index()`.
const WEEKDAY_NAMES: [&str; 7] = ["domingo", "lunes", "martes", "miercoles", "jueves", "viernes", "sabado"];

impl Weekday {
  pub fn from_index(i: u8) -> Self {
    match i % 7 {
      0 => Weekday::Domingo,
      1 => Weekday::Lunes,
      2 => Weekday::Martes,
      3 => Weekday::Miercoles,
      4 => Weekday::Jueves,
      5 => Weekday::Viernes,
      _ => Weekday::Sabado,
    }
  }

  pub fn index(self) -> u8 {
    match self {
      Weekday::Domingo => 0,
      Weekday::Lunes => 1,
      Weekday::Martes => 2,
      Weekday::Miercoles => 3,
      Weekday::Jueves => 4,
      Weekday::Viernes => 5,
      Weekday::Sabado => 6,
    }
  }

  pub fn nombre(self) -> &'static str {
    WEEKDAY_NAMES[self.index() as usize]
  }

  /// Busca una etiqueta libre ("Miércoles", "sabado", " MARTES ") en la tabla
  /// fija de nombres, sin distinguir mayúsculas ni acentos. `None` si la
  /// etiqueta no corresponde a ningún día.
  pub fn from_label(label: &str) -> Option<Self> {
    let folded = fold_accents(label.trim());
    WEEKDAY_NAMES.iter()
                 .position(|n| *n == folded)
                 .map(|i| Weekday::from_index(i as u8))
  }
}

impl fmt::Display for Weekday {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.nombre())
  }
}

/// Minúsculas + colapso de vocales acentuadas, para comparar etiquetas y
/// nombres de mes almacenados con ortografía irregular.
pub(crate) fn fold_accents(s: &str) -> String {
  s.chars()
   .flat_map(char::to_lowercase)
   .map(|c| match c {
     'á' | 'à' | 'ä' => 'a',
     'é' | 'è' | 'ë' => 'e',
     'í' | 'ì' | 'ï' => 'i',
     'ó' | 'ò' | 'ö' => 'o',
     'ú' | 'ù' | 'ü' => 'u',
     other => other,
   })
   .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_accepts_only_canonical() {
    assert!(CanonicalDate::parse("2026-01-19").is_ok());
    assert!(CanonicalDate::parse("2026-1-19").is_err());
    assert!(CanonicalDate::parse("2026-02-30").is_err());
    assert!(CanonicalDate::parse("N/A").is_err());
  }

  #[test]
  fn lexicographic_order_is_chronological() {
    let a = CanonicalDate::parse("2025-12-31").unwrap();
    let b = CanonicalDate::parse("2026-01-01").unwrap();
    assert!(a < b);
    assert!(a.as_str() < b.as_str());
  }

  #[test]
  fn weekday_of_known_dates() {
    let lunes = CanonicalDate::parse("2026-01-19").unwrap();
    assert_eq!(lunes.weekday(), Weekday::Lunes);
    let sabado = CanonicalDate::parse("2026-01-17").unwrap();
    assert_eq!(sabado.weekday(), Weekday::Sabado);
    let miercoles = CanonicalDate::parse("2026-01-21").unwrap();
    assert_eq!(miercoles.weekday(), Weekday::Miercoles);
  }

  #[test]
  fn labels_fold_case_and_accents() {
    assert_eq!(Weekday::from_label("Miércoles"), Some(Weekday::Miercoles));
    assert_eq!(Weekday::from_label("SÁBADO"), Some(Weekday::Sabado));
    assert_eq!(Weekday::from_label(" martes "), Some(Weekday::Martes));
    assert_eq!(Weekday::from_label("feriado"), None);
    assert_eq!(Weekday::from_label(""), None);
  }

  #[test]
  fn serde_round_trip_validates() {
    let d = CanonicalDate::parse("2026-01-21").unwrap();
    let js = serde_json::to_string(&d).unwrap();
    assert_eq!(js, "\"2026-01-21\"");
    let back: CanonicalDate = serde_json::from_str(&js).unwrap();
    assert_eq!(back, d);
    let bad: Result<CanonicalDate, _> = serde_json::from_str("\"21/01/2026\"");
    assert!(bad.is_err());
  }
}
