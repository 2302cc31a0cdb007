// Archivo: repository.rs
// Propósito: definir el trait `OrderStore`, el contrato con el colaborador
// externo de persistencia (almacén documental). Describe las únicas tres
// operaciones que el motor necesita: listar, leer y escribir un solo campo.
use crate::errors::Result;
use async_trait::async_trait;
use envio_domain::Order;
use serde_json::Value as JsonValue;

/// Contrato mínimo con el almacén de pedidos.
///
/// El motor trata cada pedido como instantánea inmutable por llamada y sólo
/// propone reemplazos para `fecha_entrega_programada`; el almacén es dueño de
/// los registros y de su atomicidad por documento. No hay transacciones que
/// crucen más de un registro.
#[async_trait]
pub trait OrderStore: Send + Sync {
  /// Lista todos los pedidos visibles para las consultas y los lotes.
  async fn list_orders(&self) -> Result<Vec<Order>>;

  /// Recupera un pedido por su id de documento.
  async fn get_order(&self, id: &str) -> Result<Option<Order>>;

  /// Escribe únicamente el campo `fecha_entrega_programada` del pedido
  /// indicado. No debe tocar ningún otro campo. Idempotente: reescribir el
  /// mismo valor es un no-op para el negocio.
  async fn update_fecha(&self, id: &str, nuevo_valor: &JsonValue) -> Result<()>;
}
