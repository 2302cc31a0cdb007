// Archivo: service.rs
// Propósito: implementar `CycleService`, la capa orquestadora que expone las
// operaciones de alto nivel del motor de ciclos. Esta capa es la superficie
// que los handlers de la aplicación circundante invocan.
use crate::engine::{AnnotatedOrder, BatchReport, CycleEngine, EngineConfig, PayoutBucket};
use crate::errors::Result;
use crate::repository::OrderStore;
use envio_domain::CanonicalDate;
use std::sync::Arc;

/// Servicio de alto nivel sobre el motor de ciclos.
///
/// El `CycleEngine` se construye internamente y se reusa. Los adaptadores
/// llamadores sólo deben canonizar su "hoy" y delegar aquí.
pub struct CycleService<R>
  where R: OrderStore
{
  engine: Arc<CycleEngine<R>>,
}

impl<R> CycleService<R> where R: OrderStore + 'static
{
  /// Crea el servicio inyectando el almacén y la configuración del motor.
  pub fn new(store: Arc<R>, config: EngineConfig) -> Self {
    let engine = Arc::new(CycleEngine::new(store, config));
    Self { engine }
  }

  /// Pedidos urgentes de empaque para el día dado.
  pub async fn urgent_to_pack(&self, today: &CanonicalDate) -> Result<Vec<AnnotatedOrder>> {
    self.engine.urgent_to_pack(today).await
  }

  /// Pedidos en la ventana de envío vigente para el día dado.
  pub async fn in_shipment_window(&self, today: &CanonicalDate) -> Result<Vec<AnnotatedOrder>> {
    self.engine.in_shipment_window(today).await
  }

  /// Revisión de pagos: instancias vigente y anterior de cada ciclo.
  pub async fn payout_review(&self, today: &CanonicalDate) -> Result<Vec<PayoutBucket>> {
    self.engine.payout_review(today).await
  }

  /// Lote de migración de marcas de tiempo legadas. Seguro de re-ejecutar.
  pub async fn migrate_timestamps(&self) -> Result<BatchReport> {
    self.engine.migrate_timestamps().await
  }

  /// Lote de conciliación de etiquetas de día. Seguro de re-ejecutar.
  pub async fn reconcile_weekday_labels(&self) -> Result<BatchReport> {
    self.engine.reconcile_weekday_labels().await
  }
}
