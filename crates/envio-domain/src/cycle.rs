// cycle.rs
// Ciclos de envío bisemanales: ciclo "miércoles" (mié-jue-vie) y ciclo
// "sábado" (sáb-dom-lun-mar). Los ciclos son valores derivados: se recomputan
// a partir de "hoy" o de la fecha de un pedido, nunca se almacenan.
//
// Máquina de estados sobre fechas canónicas, no sobre reloj de pared: toda
// comparación de ventanas es entre cadenas `YYYY-MM-DD`.
use crate::{CanonicalDate, DomainError, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tipo de ciclo recurrente, identificado por su día ancla.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleType {
  Miercoles,
  Sabado,
}

impl CycleType {
  pub const ALL: [CycleType; 2] = [CycleType::Miercoles, CycleType::Sabado];

  pub fn anchor_weekday(self) -> Weekday {
    match self {
      CycleType::Miercoles => Weekday::Miercoles,
      CycleType::Sabado => Weekday::Sabado,
    }
  }

  /// Días miembro del ciclo, ancla incluida (mié 3, sáb 4).
  pub fn member_len(self) -> i64 {
    match self {
      CycleType::Miercoles => 3,
      CycleType::Sabado => 4,
    }
  }

  /// Días previos al ancla que cubre la ventana de pago de este ciclo
  /// (miércoles: sáb..mar = 4; sábado: mié..vie = 3).
  pub fn payout_span(self) -> i64 {
    match self {
      CycleType::Miercoles => 4,
      CycleType::Sabado => 3,
    }
  }
}

impl fmt::Display for CycleType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CycleType::Miercoles => f.write_str("miercoles"),
      CycleType::Sabado => f.write_str("sabado"),
    }
  }
}

/// Ventana cerrada-cerrada de fechas canónicas. La pertenencia es comparación
/// de cadenas, válida porque ambos extremos son `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
  pub desde: CanonicalDate,
  pub hasta: CanonicalDate,
}

impl DateWindow {
  pub fn contains(&self, date: &CanonicalDate) -> bool {
    self.desde.as_str() <= date.as_str() && date.as_str() <= self.hasta.as_str()
  }
}

impl fmt::Display for DateWindow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}, {}]", self.desde, self.hasta)
  }
}

/// Instancia concreta de un ciclo: su tipo más el ancla que la inicia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
  pub tipo: CycleType,
  pub anchor: CanonicalDate,
}

impl Cycle {
  /// Días miembro: el ancla y los 2 (miércoles) o 3 (sábado) días siguientes.
  pub fn members(&self) -> DateWindow {
    DateWindow { desde: self.anchor.clone(),
                 hasta: self.anchor.add_days(self.tipo.member_len() - 1) }
  }

  /// Ciclo al que pertenece una fecha: el del ancla más reciente. Los dos
  /// tramos (mié-vie y sáb-mar) recubren la semana completa, así que toda
  /// fecha pertenece a exactamente un ciclo.
  pub fn containing(date: &CanonicalDate) -> Result<Cycle, DomainError> {
    let anchor = most_recent_anchor(date)?;
    let tipo = match anchor.weekday() {
      Weekday::Sabado => CycleType::Sabado,
      _ => CycleType::Miercoles,
    };
    Ok(Cycle { tipo, anchor })
  }
}

fn is_anchor(date: &CanonicalDate) -> bool {
  matches!(date.weekday(), Weekday::Miercoles | Weekday::Sabado)
}

// El recorrido día a día está acotado a una semana completa: agotar la cota
// sólo puede significar un defecto del núcleo de calendario.
const SCAN_BOUND: i64 = 7;

fn scan<F>(today: &CanonicalDate, step: i64, pred: F) -> Result<CanonicalDate, DomainError>
  where F: Fn(&CanonicalDate) -> bool
{
  for k in 0..=SCAN_BOUND {
    let candidate = today.add_days(step * k);
    if pred(&candidate) {
      return Ok(candidate);
    }
  }
  Err(DomainError::CalendarError(format!("sin ancla a {} días de {}", SCAN_BOUND, today)))
}

/// Ancla (miércoles o sábado) más reciente, `today` incluido: si hoy es día
/// ancla se devuelve de inmediato, a distancia 0, sin recorrer.
pub fn most_recent_anchor(today: &CanonicalDate) -> Result<CanonicalDate, DomainError> {
  scan(today, -1, is_anchor)
}

/// Próxima ancla (miércoles o sábado), `today` incluido.
pub fn next_anchor(today: &CanonicalDate) -> Result<CanonicalDate, DomainError> {
  scan(today, 1, is_anchor)
}

/// Próxima fecha (hoy incluido) cuyo día de semana es el ancla del tipo dado.
pub fn next_anchor_of(today: &CanonicalDate, tipo: CycleType) -> Result<CanonicalDate, DomainError> {
  scan(today, 1, |d| d.weekday() == tipo.anchor_weekday())
}

/// Fecha límite de urgencia de empaque: ancla más reciente más el umbral
/// (7 días en la política vigente). Un pedido pendiente es urgente si su
/// fecha canónica es estrictamente menor que este límite.
pub fn packing_deadline(today: &CanonicalDate, urgent_threshold_days: i64) -> Result<CanonicalDate, DomainError> {
  Ok(most_recent_anchor(today)?.add_days(urgent_threshold_days))
}

/// Ventana de envío vigente: `[ancla, ancla+2]` cerrada-cerrada, donde el
/// ancla es hoy si hoy es día ancla, o la próxima ancla en caso contrario.
pub fn shipment_window(today: &CanonicalDate) -> Result<DateWindow, DomainError> {
  let anchor = if is_anchor(today) {
    today.clone()
  } else {
    next_anchor(today)?
  };
  let hasta = anchor.add_days(2);
  Ok(DateWindow { desde: anchor, hasta })
}

/// Ventana de elegibilidad de pago de una instancia de ciclo: los días
/// previos al ancla (miércoles: sáb..mar; sábado: mié..vie), cerrada-cerrada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutWindow {
  pub tipo: CycleType,
  pub anchor: CanonicalDate,
  pub window: DateWindow,
}

impl PayoutWindow {
  fn for_anchor(tipo: CycleType, anchor: CanonicalDate) -> PayoutWindow {
    let window = DateWindow { desde: anchor.add_days(-tipo.payout_span()),
                              hasta: anchor.add_days(-1) };
    PayoutWindow { tipo, anchor, window }
  }
}

/// Para cada tipo de ciclo, la instancia vigente y la inmediatamente
/// anterior (una siempre presente/futura, otra siempre pasada), de modo que
/// la revisión de pagos muestre a la vez un ciclo por cerrar y uno recién
/// cerrado. Orden estable: miércoles anterior, miércoles vigente, sábado
/// anterior, sábado vigente.
pub fn payout_windows(today: &CanonicalDate) -> Result<Vec<PayoutWindow>, DomainError> {
  let mut out = Vec::with_capacity(4);
  for tipo in CycleType::ALL {
    let current = next_anchor_of(today, tipo)?;
    let previous = current.add_days(-7);
    out.push(PayoutWindow::for_anchor(tipo, previous));
    out.push(PayoutWindow::for_anchor(tipo, current));
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> CanonicalDate {
    CanonicalDate::parse(s).unwrap()
  }

  #[test]
  fn most_recent_anchor_from_monday() {
    // 2026-01-19 es lunes; el ancla más reciente es el sábado 17
    assert_eq!(most_recent_anchor(&d("2026-01-19")).unwrap(), d("2026-01-17"));
  }

  #[test]
  fn anchor_day_returns_itself() {
    assert_eq!(most_recent_anchor(&d("2026-01-21")).unwrap(), d("2026-01-21"));
    assert_eq!(next_anchor(&d("2026-01-17")).unwrap(), d("2026-01-17"));
  }

  #[test]
  fn packing_deadline_from_monday() {
    assert_eq!(packing_deadline(&d("2026-01-19"), 7).unwrap(), d("2026-01-24"));
  }

  #[test]
  fn shipment_window_on_anchor_day() {
    // 2026-01-21 es miércoles, día ancla
    let w = shipment_window(&d("2026-01-21")).unwrap();
    assert_eq!(w, DateWindow { desde: d("2026-01-21"), hasta: d("2026-01-23") });
  }

  #[test]
  fn shipment_window_from_non_anchor() {
    // Desde el lunes 19, la próxima ancla es el miércoles 21
    let w = shipment_window(&d("2026-01-19")).unwrap();
    assert_eq!(w.desde, d("2026-01-21"));
    assert_eq!(w.hasta, d("2026-01-23"));
    assert!(w.contains(&d("2026-01-21")));
    assert!(w.contains(&d("2026-01-23")));
    assert!(!w.contains(&d("2026-01-24")));
  }

  #[test]
  fn cycle_members_cover_the_week() {
    let wed = Cycle { tipo: CycleType::Miercoles, anchor: d("2026-01-21") };
    assert_eq!(wed.members(), DateWindow { desde: d("2026-01-21"), hasta: d("2026-01-23") });
    let sat = Cycle { tipo: CycleType::Sabado, anchor: d("2026-01-17") };
    assert_eq!(sat.members(), DateWindow { desde: d("2026-01-17"), hasta: d("2026-01-20") });
  }

  #[test]
  fn containing_assigns_every_date_to_one_cycle() {
    // lunes 19 → ciclo sábado anclado el 17
    let c = Cycle::containing(&d("2026-01-19")).unwrap();
    assert_eq!(c.tipo, CycleType::Sabado);
    assert_eq!(c.anchor, d("2026-01-17"));
    // jueves 22 → ciclo miércoles anclado el 21
    let c = Cycle::containing(&d("2026-01-22")).unwrap();
    assert_eq!(c.tipo, CycleType::Miercoles);
    assert_eq!(c.anchor, d("2026-01-21"));
    // un día ancla pertenece a su propio ciclo
    let c = Cycle::containing(&d("2026-01-17")).unwrap();
    assert_eq!(c.anchor, d("2026-01-17"));
  }

  #[test]
  fn payout_windows_current_and_previous() {
    // Hoy lunes 2026-01-19: próximo miércoles 21, próximo sábado 24
    let ws = payout_windows(&d("2026-01-19")).unwrap();
    assert_eq!(ws.len(), 4);
    // miércoles anterior (14): ventana sáb 10 .. mar 13
    assert_eq!(ws[0].tipo, CycleType::Miercoles);
    assert_eq!(ws[0].anchor, d("2026-01-14"));
    assert_eq!(ws[0].window, DateWindow { desde: d("2026-01-10"), hasta: d("2026-01-13") });
    // miércoles vigente (21): ventana sáb 17 .. mar 20
    assert_eq!(ws[1].anchor, d("2026-01-21"));
    assert_eq!(ws[1].window, DateWindow { desde: d("2026-01-17"), hasta: d("2026-01-20") });
    // sábado anterior (17): ventana mié 14 .. vie 16
    assert_eq!(ws[2].tipo, CycleType::Sabado);
    assert_eq!(ws[2].anchor, d("2026-01-17"));
    assert_eq!(ws[2].window, DateWindow { desde: d("2026-01-14"), hasta: d("2026-01-16") });
    // sábado vigente (24): ventana mié 21 .. vie 23
    assert_eq!(ws[3].anchor, d("2026-01-24"));
    assert_eq!(ws[3].window, DateWindow { desde: d("2026-01-21"), hasta: d("2026-01-23") });
  }

  #[test]
  fn payout_window_weekday_coverage() {
    let ws = payout_windows(&d("2026-01-19")).unwrap();
    // Ciclo miércoles cubre sáb..mar previos al ancla
    assert_eq!(ws[1].window.desde.weekday(), Weekday::Sabado);
    assert_eq!(ws[1].window.hasta.weekday(), Weekday::Martes);
    // Ciclo sábado cubre mié..vie previos al ancla
    assert_eq!(ws[3].window.desde.weekday(), Weekday::Miercoles);
    assert_eq!(ws[3].window.hasta.weekday(), Weekday::Viernes);
  }
}
