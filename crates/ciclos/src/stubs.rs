// Archivo: stubs.rs
// Propósito: implementación en memoria del almacén de pedidos para pruebas y
// demos locales. No es durable; conserva el orden de inserción y permite
// inyectar fallos de escritura por id para ejercitar el fallo parcial.
use crate::errors::{CicloError, Result};
use crate::repository::OrderStore;
use async_trait::async_trait;
use envio_domain::{Order, OrderStatus};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Almacén de pedidos en memoria.
pub struct InMemoryOrderStore {
  orders: Mutex<Vec<Order>>,
  fail_writes: Mutex<HashSet<String>>,
}

impl InMemoryOrderStore {
  pub fn new() -> Self {
    Self { orders: Mutex::new(Vec::new()),
           fail_writes: Mutex::new(HashSet::new()) }
  }

  fn lock_orders(&self) -> MutexGuard<'_, Vec<Order>> {
    self.orders.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Inserta un pedido ya construido (conserva su id).
  pub fn seed(&self, order: Order) {
    self.lock_orders().push(order);
  }

  /// Crea y guarda un pedido con id generado; devuelve el id.
  pub fn create_order(&self, estado: OrderStatus, fecha: JsonValue, dia_entrega: Option<String>) -> String {
    let id = Uuid::new_v4().to_string();
    self.seed(Order { id: id.clone(),
                      estado,
                      fecha_entrega_programada: fecha,
                      dia_entrega });
    id
  }

  /// Hace fallar toda escritura futura sobre el pedido indicado.
  pub fn fail_writes_for(&self, id: &str) {
    self.fail_writes
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(id.to_string());
  }

  /// Cuenta de pedidos almacenados (útil en pruebas).
  pub fn len(&self) -> usize {
    self.lock_orders().len()
  }

  pub fn is_empty(&self) -> bool {
    self.lock_orders().is_empty()
  }
}

impl Default for InMemoryOrderStore {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
  async fn list_orders(&self) -> Result<Vec<Order>> {
    Ok(self.lock_orders().clone())
  }

  async fn get_order(&self, id: &str) -> Result<Option<Order>> {
    Ok(self.lock_orders().iter().find(|o| o.id == id).cloned())
  }

  async fn update_fecha(&self, id: &str, nuevo_valor: &JsonValue) -> Result<()> {
    let failing = self.fail_writes
                      .lock()
                      .unwrap_or_else(|e| e.into_inner())
                      .contains(id);
    if failing {
      return Err(CicloError::Storage(format!("fallo inyectado al escribir {}", id)));
    }
    let mut orders = self.lock_orders();
    match orders.iter_mut().find(|o| o.id == id) {
      Some(order) => {
        order.fecha_entrega_programada = nuevo_valor.clone();
        Ok(())
      }
      None => Err(CicloError::NotFound(format!("pedido {}", id))),
    }
  }
}
