// Archivo: engine.rs
// Propósito: implementar `CycleEngine`, el motor de consultas de ventanas y
// de los lotes de migración/conciliación sobre el almacén de pedidos.
//
// El motor es puro respecto a la memoria del proceso: sin estado mutable
// compartido ni locks propios. Los únicos puntos de suspensión son las
// llamadas al `OrderStore`; un fallo de escritura en un registro se cuenta y
// el lote continúa (fallo parcial, nunca fail-fast).
use crate::errors::Result;
use crate::repository::OrderStore;
use chrono::{DateTime, Utc};
use envio_domain::{CanonicalDate, Order, PayoutWindow, Weekday, NO_DISPONIBLE};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Configuración del motor. Las constantes de política que la fuente
/// codificaba como literales quedan expuestas aquí con esos mismos valores
/// por defecto.
#[derive(Debug, Clone)]
pub struct EngineConfig {
  /// Desplazamiento UTC fijo del despliegue, en horas (la zona única del
  /// negocio; jamás la zona local del host).
  pub fixed_utc_offset_hours: i32,
  /// Umbral de urgencia de empaque: días después del ancla más reciente.
  pub urgent_threshold_days: i64,
  /// Radio de búsqueda de la conciliación de etiquetas, en días (±).
  pub reconcile_window_days: i64,
  /// Cota del abanico de escrituras concurrentes contra el almacén.
  pub max_concurrent_writes: usize,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self { fixed_utc_offset_hours: -6,
           urgent_threshold_days: 7,
           reconcile_window_days: 3,
           max_concurrent_writes: 8 }
  }
}

/// Pedido calificado por una consulta, anotado con la fecha canónica que se
/// computó para él (nunca con el valor crudo original).
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedOrder {
  pub order: Order,
  pub fecha_canonica: CanonicalDate,
}

/// Una instancia de ventana de pago junto con sus pedidos calificados.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutBucket {
  pub window: PayoutWindow,
  pub orders: Vec<AnnotatedOrder>,
}

/// Desenlace por registro de una operación de lote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  Corrected,
  Unresolved,
  WriteError,
}

/// Valor antes/después de un registro tocado por un lote, para auditoría.
#[derive(Debug, Clone, Serialize)]
pub struct RecordDetail {
  pub record_id: String,
  pub before: String,
  pub after: String,
  pub outcome: Outcome,
}

/// Reporte estructurado de una operación de lote. Reemplaza al logging de
/// depuración incrustado: el llamador decide cómo mostrarlo o registrarlo.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
  pub corrected: usize,
  pub already_correct: usize,
  pub unresolved: usize,
  pub errors: usize,
  pub details: Vec<RecordDetail>,
  pub generated_at: DateTime<Utc>,
}

impl BatchReport {
  fn new() -> Self {
    Self { corrected: 0,
           already_correct: 0,
           unresolved: 0,
           errors: 0,
           details: Vec::new(),
           generated_at: Utc::now() }
  }
}

/// Petición de escritura pendiente: un solo campo de un solo registro.
struct PendingWrite {
  record_id: String,
  before: String,
  after: String,
  value: JsonValue,
}

/// Motor de ventanas de ciclo y lotes de corrección.
///
/// Todas las consultas reciben `today` ya canonizado por el llamador: aquí no
/// entra ningún reloj ambiente, lo que mantiene al motor como función pura de
/// sus entradas y trivialmente testeable sin simular el reloj.
pub struct CycleEngine<R>
  where R: OrderStore
{
  store: Arc<R>,
  config: EngineConfig,
}

impl<R> CycleEngine<R> where R: OrderStore + 'static
{
  pub fn new(store: Arc<R>, config: EngineConfig) -> Self {
    Self { store, config }
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  fn fecha_canonica(&self, order: &Order) -> Option<CanonicalDate> {
    order.fecha_canonica(self.config.fixed_utc_offset_hours)
  }

  /// Pedidos urgentes de empaque: estado pendiente y fecha canónica
  /// estrictamente menor que el límite (ancla más reciente + umbral).
  /// Orden ascendente por fecha canónica.
  pub async fn urgent_to_pack(&self, today: &CanonicalDate) -> Result<Vec<AnnotatedOrder>> {
    let deadline = envio_domain::packing_deadline(today, self.config.urgent_threshold_days)?;
    let orders = self.store.list_orders().await?;
    let mut out = Vec::new();
    for order in orders {
      if !order.estado.es_pendiente() {
        continue;
      }
      match self.fecha_canonica(&order) {
        Some(fecha) if fecha.as_str() < deadline.as_str() => {
          out.push(AnnotatedOrder { order, fecha_canonica: fecha });
        }
        Some(_) => {}
        None => log::warn!("Pedido {} sin fecha canonizable; excluido de urgentes", order.id),
      }
    }
    sort_annotated(&mut out);
    Ok(out)
  }

  /// Pedidos dentro de la ventana de envío vigente (cerrada-cerrada):
  /// pendientes o empacados cuya fecha canónica cae en la ventana.
  pub async fn in_shipment_window(&self, today: &CanonicalDate) -> Result<Vec<AnnotatedOrder>> {
    let window = envio_domain::shipment_window(today)?;
    let orders = self.store.list_orders().await?;
    let mut out = Vec::new();
    for order in orders {
      if !order.estado.cuenta_para_envio() {
        continue;
      }
      match self.fecha_canonica(&order) {
        Some(fecha) if window.contains(&fecha) => {
          out.push(AnnotatedOrder { order, fecha_canonica: fecha });
        }
        Some(_) => {}
        None => log::warn!("Pedido {} sin fecha canonizable; excluido de envío", order.id),
      }
    }
    sort_annotated(&mut out);
    Ok(out)
  }

  /// Revisión de pagos: para cada tipo de ciclo, la instancia vigente y la
  /// inmediatamente anterior, cada una con sus pedidos elegibles (estados de
  /// pago) cuya fecha cae en la ventana de esa instancia.
  pub async fn payout_review(&self, today: &CanonicalDate) -> Result<Vec<PayoutBucket>> {
    let windows = envio_domain::payout_windows(today)?;
    let orders = self.store.list_orders().await?;
    let mut annotated = Vec::new();
    for order in orders {
      if !order.estado.cuenta_para_pago() {
        continue;
      }
      match self.fecha_canonica(&order) {
        Some(fecha) => annotated.push(AnnotatedOrder { order, fecha_canonica: fecha }),
        None => log::warn!("Pedido {} sin fecha canonizable; excluido de pagos", order.id),
      }
    }
    let mut buckets = Vec::with_capacity(windows.len());
    for window in windows {
      let mut qualifying: Vec<AnnotatedOrder> =
        annotated.iter().filter(|a| window.window.contains(&a.fecha_canonica)).cloned().collect();
      sort_annotated(&mut qualifying);
      buckets.push(PayoutBucket { window, orders: qualifying });
    }
    Ok(buckets)
  }

  /// Migración de marcas de tiempo: convierte valores legados no canónicos a
  /// cadenas canónicas. Idempotente: una fecha ya canónica cuenta como "ya
  /// migrada" y no produce escritura alguna en la segunda pasada.
  pub async fn migrate_timestamps(&self) -> Result<BatchReport> {
    let orders = self.store.list_orders().await?;
    let mut report = BatchReport::new();
    let mut pending = Vec::new();
    for order in orders {
      if order.fecha_ya_canonica() {
        report.already_correct += 1;
        continue;
      }
      let before = render_raw(&order.fecha_entrega_programada);
      match self.fecha_canonica(&order) {
        Some(canonical) => {
          pending.push(PendingWrite { record_id: order.id,
                                      before,
                                      after: canonical.to_string(),
                                      value: JsonValue::String(canonical.to_string()) });
        }
        None => {
          report.unresolved += 1;
          report.details.push(RecordDetail { record_id: order.id,
                                             before,
                                             after: NO_DISPONIBLE.to_string(),
                                             outcome: Outcome::Unresolved });
        }
      }
    }
    self.apply_writes(pending, &mut report).await;
    report.details.sort_by(|a, b| a.record_id.cmp(&b.record_id));
    Ok(report)
  }

  /// Conciliación de etiquetas de día: corrige la fecha almacenada cuando no
  /// coincide con la etiqueta `dia_entrega` registrada, buscando la fecha más
  /// cercana dentro de ±`reconcile_window_days` cuyo día de semana coincida.
  /// Más allá de ese radio no se adivina: el registro queda sin resolver para
  /// revisión humana. Idempotente: si ya coinciden no hay escritura.
  pub async fn reconcile_weekday_labels(&self) -> Result<BatchReport> {
    let orders = self.store.list_orders().await?;
    let mut report = BatchReport::new();
    let mut pending = Vec::new();
    for order in orders {
      let label = match &order.dia_entrega {
        Some(l) => l.clone(),
        // Sin etiqueta no hay nada que conciliar: el registro no es candidato.
        None => continue,
      };
      let before = render_raw(&order.fecha_entrega_programada);
      let target = match Weekday::from_label(&label) {
        Some(t) => t,
        None => {
          report.unresolved += 1;
          report.details.push(RecordDetail { record_id: order.id,
                                             before,
                                             after: NO_DISPONIBLE.to_string(),
                                             outcome: Outcome::Unresolved });
          continue;
        }
      };
      let fecha = match self.fecha_canonica(&order) {
        Some(f) => f,
        None => {
          report.unresolved += 1;
          report.details.push(RecordDetail { record_id: order.id,
                                             before,
                                             after: NO_DISPONIBLE.to_string(),
                                             outcome: Outcome::Unresolved });
          continue;
        }
      };
      if fecha.weekday() == target {
        report.already_correct += 1;
        continue;
      }
      match nearest_matching_date(&fecha, target, self.config.reconcile_window_days) {
        Some(corrected) => {
          pending.push(PendingWrite { record_id: order.id,
                                      before: fecha.to_string(),
                                      after: corrected.to_string(),
                                      value: JsonValue::String(corrected.to_string()) });
        }
        None => {
          report.unresolved += 1;
          report.details.push(RecordDetail { record_id: order.id,
                                             before: fecha.to_string(),
                                             after: NO_DISPONIBLE.to_string(),
                                             outcome: Outcome::Unresolved });
        }
      }
    }
    self.apply_writes(pending, &mut report).await;
    report.details.sort_by(|a, b| a.record_id.cmp(&b.record_id));
    Ok(report)
  }

  /// Abanico acotado de escrituras: cada corrección es independiente e
  /// idempotente, así que pueden ir en paralelo contra el almacén. Un fallo
  /// se cuenta como error y el resto del lote continúa.
  async fn apply_writes(&self, pending: Vec<PendingWrite>, report: &mut BatchReport) {
    let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_writes.max(1)));
    let mut tasks: JoinSet<RecordDetail> = JoinSet::new();
    for write in pending {
      let store = Arc::clone(&self.store);
      let semaphore = Arc::clone(&semaphore);
      tasks.spawn(async move {
        let _permit = match semaphore.acquire_owned().await {
          Ok(permit) => permit,
          Err(_) => {
            return RecordDetail { record_id: write.record_id,
                                  before: write.before,
                                  after: write.after,
                                  outcome: Outcome::WriteError };
          }
        };
        let outcome = match store.update_fecha(&write.record_id, &write.value).await {
          Ok(()) => Outcome::Corrected,
          Err(e) => {
            log::warn!("Fallo al escribir el pedido {}: {}", write.record_id, e);
            Outcome::WriteError
          }
        };
        RecordDetail { record_id: write.record_id,
                       before: write.before,
                       after: write.after,
                       outcome }
      });
    }
    while let Some(joined) = tasks.join_next().await {
      match joined {
        Ok(detail) => {
          match detail.outcome {
            Outcome::Corrected => report.corrected += 1,
            Outcome::WriteError => report.errors += 1,
            Outcome::Unresolved => report.unresolved += 1,
          }
          report.details.push(detail);
        }
        Err(e) => {
          log::warn!("Tarea de escritura abortada: {}", e);
          report.errors += 1;
        }
      }
    }
  }
}

fn sort_annotated(orders: &mut [AnnotatedOrder]) {
  orders.sort_by(|a, b| {
           a.fecha_canonica
            .cmp(&b.fecha_canonica)
            .then_with(|| a.order.id.cmp(&b.order.id))
         });
}

/// Valor crudo para auditoría: las cadenas van tal cual, lo nulo como "N/A" y
/// el resto como JSON compacto.
fn render_raw(value: &JsonValue) -> String {
  match value {
    JsonValue::String(s) => s.clone(),
    JsonValue::Null => NO_DISPONIBLE.to_string(),
    other => other.to_string(),
  }
}

/// Fecha más cercana a `fecha` (pasado antes que futuro en los empates) cuyo
/// día de semana es `target`, dentro de ±`window_days`. `None` si no existe
/// en ese radio.
fn nearest_matching_date(fecha: &CanonicalDate, target: Weekday, window_days: i64) -> Option<CanonicalDate> {
  for k in 1..=window_days {
    for candidate in [fecha.add_days(-k), fecha.add_days(k)] {
      if candidate.weekday() == target {
        return Some(candidate);
      }
    }
  }
  None
}
