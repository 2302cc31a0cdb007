// calendar.rs
// Núcleo de calendario: aritmética entera pura sobre números de día juliano.
//
// Aquí no existe ningún objeto de fecha/hora ni zona horaria: sólo enteros y
// cadenas de formato fijo `YYYY-MM-DD`. Eso hace la aritmética inmune a
// longitudes de mes, años bisiestos y conversiones de zona.

/// Número de día juliano del 1970-01-01 (época Unix).
const JD_UNIX_EPOCH: i64 = 2_440_588;

/// Valor centinela devuelto por [`to_julian_day`] ante entrada malformada.
pub const JD_INVALID: i64 = 0;

pub fn is_leap_year(year: i64) -> bool {
  (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i64, month: u32) -> u32 {
  match month {
    1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
    4 | 6 | 9 | 11 => 30,
    2 => {
      if is_leap_year(year) {
        29
      } else {
        28
      }
    }
    _ => 0,
  }
}

/// Descompone una cadena `YYYY-MM-DD` estricta en (año, mes, día).
/// Valida estructura y calendario real (mes 1-12, día según el mes, año
/// 0001-9999). Devuelve `None` ante cualquier desviación.
fn parse_ymd(s: &str) -> Option<(i64, u32, u32)> {
  let b = s.as_bytes();
  if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
    return None;
  }
  for (i, c) in b.iter().enumerate() {
    if i != 4 && i != 7 && !c.is_ascii_digit() {
      return None;
    }
  }
  let year: i64 = s[0..4].parse().ok()?;
  let month: u32 = s[5..7].parse().ok()?;
  let day: u32 = s[8..10].parse().ok()?;
  if year < 1 || !(1..=12).contains(&month) {
    return None;
  }
  if day < 1 || day > days_in_month(year, month) {
    return None;
  }
  Some((year, month, day))
}

// Algoritmos civiles de Howard Hinnant (calendario gregoriano proléptico).
// Conversión exacta entre (año, mes, día) y días desde la época Unix.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
  let y = if month <= 2 { year - 1 } else { year };
  let m = if month <= 2 { month as i64 + 9 } else { month as i64 - 3 };
  let era = if y >= 0 { y } else { y - 399 } / 400;
  let yoe = (y - era * 400) as u64;
  let doy = (153 * m as u64 + 2) / 5 + day as u64 - 1;
  let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
  era * 146_097 + doe as i64 - 719_468
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
  let z = days + 719_468;
  let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
  let doe = (z - era * 146_097) as u64;
  let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
  let y = yoe as i64 + era * 400;
  let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
  let mp = (5 * doy + 2) / 153;
  let d = doy - (153 * mp + 2) / 5 + 1;
  let m = if mp < 10 { mp + 3 } else { mp - 9 };
  let y = if m <= 2 { y + 1 } else { y };
  (y, m as u32, d as u32)
}

/// Convierte una fecha canónica `YYYY-MM-DD` a número de día juliano.
///
/// Devuelve el centinela [`JD_INVALID`] (0) cuando la entrada no es una fecha
/// canónica estructuralmente válida; nunca lanza pánico. Los llamadores deben
/// tratar el centinela como "inutilizable, excluir".
pub fn to_julian_day(date: &str) -> i64 {
  match parse_ymd(date) {
    Some((y, m, d)) => days_from_civil(y, m, d) + JD_UNIX_EPOCH,
    None => JD_INVALID,
  }
}

/// Inversa exacta de [`to_julian_day`] para todo el rango
/// 0001-01-01..9999-12-31.
pub fn from_julian_day(jd: i64) -> String {
  let (y, m, d) = civil_from_days(jd - JD_UNIX_EPOCH);
  format!("{:04}-{:02}-{:02}", y, m, d)
}

/// Suma `n` días (puede ser negativo) mediante el viaje de ida y vuelta por
/// día juliano. `None` si la entrada es malformada; el resultado siempre es
/// una fecha canónica válida, sin importar cambios de mes o año.
pub fn add_days(date: &str, n: i64) -> Option<String> {
  let jd = to_julian_day(date);
  if jd == JD_INVALID {
    return None;
  }
  Some(from_julian_day(jd + n))
}

/// Día de la semana: `(jd + 1) mod 7`, con 0 = domingo .. 6 = sábado.
/// `None` si la entrada es malformada; pura y total para toda fecha válida.
pub fn weekday(date: &str) -> Option<u8> {
  let jd = to_julian_day(date);
  if jd == JD_INVALID {
    return None;
  }
  Some(((jd + 1).rem_euclid(7)) as u8)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_julian_days() {
    // 1970-01-01 es el día juliano 2440588 (un jueves)
    assert_eq!(to_julian_day("1970-01-01"), 2_440_588);
    assert_eq!(weekday("1970-01-01"), Some(4));
    // 2000-01-01 fue sábado
    assert_eq!(weekday("2000-01-01"), Some(6));
  }

  #[test]
  fn scenario_monday_2026() {
    // 2026-01-19 es lunes
    let jd = to_julian_day("2026-01-19");
    assert_ne!(jd, JD_INVALID);
    assert_eq!(((jd + 1).rem_euclid(7)) as u8, 1);
    assert_eq!(weekday("2026-01-19"), Some(1));
  }

  #[test]
  fn add_seven_days() {
    assert_eq!(add_days("2026-01-19", 7).as_deref(), Some("2026-01-26"));
  }

  #[test]
  fn rollover_and_leap() {
    assert_eq!(add_days("2024-02-28", 1).as_deref(), Some("2024-02-29"));
    assert_eq!(add_days("2023-02-28", 1).as_deref(), Some("2023-03-01"));
    assert_eq!(add_days("2025-12-31", 1).as_deref(), Some("2026-01-01"));
    assert_eq!(add_days("2026-01-01", -1).as_deref(), Some("2025-12-31"));
  }

  #[test]
  fn round_trip_sampled_range() {
    // Muestreo amplio: cada 13 días sobre ~60 años más extremos del rango
    for k in (-10_000..30_000).step_by(13) {
      let jd = JD_UNIX_EPOCH + k;
      let s = from_julian_day(jd);
      assert_eq!(to_julian_day(&s), jd, "ida y vuelta falló para {}", s);
    }
    assert_eq!(from_julian_day(to_julian_day("0001-01-01")), "0001-01-01");
    assert_eq!(from_julian_day(to_julian_day("9999-12-31")), "9999-12-31");
  }

  #[test]
  fn add_days_inverse() {
    for n in [-400i64, -365, -31, -1, 0, 1, 31, 365, 400] {
      let there = add_days("2026-06-15", n).unwrap();
      let back = add_days(&there, -n).unwrap();
      assert_eq!(back, "2026-06-15");
    }
  }

  #[test]
  fn weekday_totality_and_stability() {
    for k in 0..800 {
      let s = from_julian_day(JD_UNIX_EPOCH + k);
      let w = weekday(&s).unwrap();
      assert!(w <= 6);
      assert_eq!(weekday(&s), Some(w));
    }
  }

  #[test]
  fn malformed_returns_sentinel() {
    for bad in ["", "N/A", "2026-1-19", "2026/01/19", "2026-13-01",
                "2026-02-30", "2026-00-10", "0000-01-01", "19-01-2026",
                "2026-01-19T00:00:00", "hoy"]
    {
      assert_eq!(to_julian_day(bad), JD_INVALID, "debió rechazar '{}'", bad);
      assert_eq!(weekday(bad), None);
      assert_eq!(add_days(bad, 1), None);
    }
  }
}
