//! Crate `envio-domain` — dominio puro del motor de fechas de ciclo
//!
//! Define el núcleo de calendario (aritmética de día juliano), la fecha
//! canónica `YYYY-MM-DD`, el canonicalizador de marcas de tiempo crudas, las
//! ventanas de los ciclos de envío (miércoles y sábado) y el modelo de
//! pedido. Todo es puro: sin reloj ambiente, sin zona del host, sin I/O.
//!
//! Diseño resumido:
//! - A prueba de zonas horarias: las comparaciones son entre cadenas
//!   canónicas, jamás entre instantes con zona.
//! - Sin pánicos fuera de tests: entrada malformada produce centinela
//!   (`JD_INVALID`), `None` o `DomainError`, nunca un crash.
mod calendar;
mod canonical_date;
mod cycle;
mod errors;
mod order;
mod timestamp;

pub use calendar::{add_days, days_in_month, from_julian_day, is_leap_year, to_julian_day, weekday, JD_INVALID};
pub use canonical_date::{CanonicalDate, Weekday};
pub use cycle::{most_recent_anchor, next_anchor, next_anchor_of, packing_deadline, payout_windows, shipment_window,
                Cycle, CycleType, DateWindow, PayoutWindow};
pub use errors::DomainError;
pub use order::{Order, OrderStatus};
pub use timestamp::{canonicalize, canonicalize_json, RawTimestamp, NO_DISPONIBLE};
