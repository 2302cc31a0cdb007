// order.rs
use crate::timestamp::{canonicalize_json, RawTimestamp};
use crate::CanonicalDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

/// Estado de un pedido tal como lo guarda el almacén documental. Los estados
/// desconocidos conservan su texto original (`Desconocido`) para que una
/// corrección nunca destruya información del colaborador de persistencia.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
  Pendiente,
  Empacado,
  Enviado,
  Recogido,
  RecogidoEnLocal,
  Remunerado,
  Cancelado,
  Desconocido(String),
}

impl OrderStatus {
  pub fn from_store(s: &str) -> Self {
    match s.trim().to_lowercase().as_str() {
      "pendiente" => OrderStatus::Pendiente,
      "empacado" => OrderStatus::Empacado,
      "enviado" => OrderStatus::Enviado,
      "recogido" => OrderStatus::Recogido,
      "recogido_en_local" | "recogido en local" => OrderStatus::RecogidoEnLocal,
      "remunerado" => OrderStatus::Remunerado,
      "cancelado" => OrderStatus::Cancelado,
      _ => OrderStatus::Desconocido(s.to_string()),
    }
  }

  pub fn as_store_str(&self) -> &str {
    match self {
      OrderStatus::Pendiente => "pendiente",
      OrderStatus::Empacado => "empacado",
      OrderStatus::Enviado => "enviado",
      OrderStatus::Recogido => "recogido",
      OrderStatus::RecogidoEnLocal => "recogido_en_local",
      OrderStatus::Remunerado => "remunerado",
      OrderStatus::Cancelado => "cancelado",
      OrderStatus::Desconocido(s) => s,
    }
  }

  pub fn es_pendiente(&self) -> bool {
    matches!(self, OrderStatus::Pendiente)
  }

  /// Pendiente o empacado: candidatos a la ventana de envío.
  pub fn cuenta_para_envio(&self) -> bool {
    matches!(self, OrderStatus::Pendiente | OrderStatus::Empacado)
  }

  /// Estados elegibles para la revisión de pagos.
  pub fn cuenta_para_pago(&self) -> bool {
    matches!(self,
             OrderStatus::Remunerado
             | OrderStatus::Cancelado
             | OrderStatus::Enviado
             | OrderStatus::Recogido
             | OrderStatus::RecogidoEnLocal)
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_store_str())
  }
}

impl Serialize for OrderStatus {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_store_str())
  }
}

impl<'de> Deserialize<'de> for OrderStatus {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(OrderStatus::from_store(&s))
  }
}

/// Instantánea inmutable de un pedido del almacén documental. El motor sólo
/// lee estos campos y, a lo sumo, propone un reemplazo para
/// `fecha_entrega_programada`; nunca toca otro campo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: String,
  pub estado: OrderStatus,
  /// Valor crudo tal como vive en el documento: puede ser cadena canónica,
  /// texto ISO o largo, número de época u objeto con `seconds`.
  pub fecha_entrega_programada: JsonValue,
  /// Etiqueta libre de día de semana ("Martes"), usada sólo por la
  /// conciliación.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dia_entrega: Option<String>,
}

impl Order {
  /// Fecha canónica del pedido bajo el desplazamiento UTC fijo, o `None` si
  /// el valor crudo no es canonizable.
  pub fn fecha_canonica(&self, fixed_utc_offset_hours: i32) -> Option<CanonicalDate> {
    canonicalize_json(&self.fecha_entrega_programada, fixed_utc_offset_hours)
  }

  /// Verdadero si el valor almacenado ya es una cadena canónica (la
  /// migración lo cuenta como "ya migrado").
  pub fn fecha_ya_canonica(&self) -> bool {
    matches!(RawTimestamp::from_json(&self.fecha_entrega_programada),
             RawTimestamp::Text(ref s) if CanonicalDate::parse(s.trim()).is_ok() && s.trim() == s)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn status_round_trips_through_store_strings() {
    for s in ["pendiente", "empacado", "enviado", "recogido",
              "recogido_en_local", "remunerado", "cancelado"]
    {
      assert_eq!(OrderStatus::from_store(s).as_store_str(), s);
    }
    let raro = OrderStatus::from_store("en_aduana");
    assert_eq!(raro, OrderStatus::Desconocido("en_aduana".into()));
    assert_eq!(raro.as_store_str(), "en_aduana");
  }

  #[test]
  fn status_predicates() {
    assert!(OrderStatus::Pendiente.es_pendiente());
    assert!(OrderStatus::Pendiente.cuenta_para_envio());
    assert!(OrderStatus::Empacado.cuenta_para_envio());
    assert!(!OrderStatus::Enviado.cuenta_para_envio());
    for s in [OrderStatus::Remunerado, OrderStatus::Cancelado, OrderStatus::Enviado,
              OrderStatus::Recogido, OrderStatus::RecogidoEnLocal]
    {
      assert!(s.cuenta_para_pago(), "{} debe contar para pago", s);
    }
    assert!(!OrderStatus::Pendiente.cuenta_para_pago());
    assert!(!OrderStatus::Desconocido("x".into()).cuenta_para_pago());
  }

  #[test]
  fn order_serde_keeps_store_field_names() {
    let o = Order { id: "abc123".into(),
                    estado: OrderStatus::Pendiente,
                    fecha_entrega_programada: json!({ "seconds": 1_768_867_200 }),
                    dia_entrega: Some("Lunes".into()) };
    let v = serde_json::to_value(&o).unwrap();
    assert_eq!(v["estado"], json!("pendiente"));
    assert_eq!(v["fecha_entrega_programada"]["seconds"], json!(1_768_867_200));
    let back: Order = serde_json::from_value(v).unwrap();
    assert_eq!(back, o);
  }

  #[test]
  fn fecha_canonica_and_ya_canonica() {
    let mut o = Order { id: "x".into(),
                        estado: OrderStatus::Pendiente,
                        fecha_entrega_programada: json!("2026-01-19"),
                        dia_entrega: None };
    assert!(o.fecha_ya_canonica());
    assert_eq!(o.fecha_canonica(-6).unwrap().as_str(), "2026-01-19");

    o.fecha_entrega_programada = json!(1_768_867_200);
    assert!(!o.fecha_ya_canonica());
    assert_eq!(o.fecha_canonica(-6).unwrap().as_str(), "2026-01-19");

    o.fecha_entrega_programada = json!(null);
    assert!(!o.fecha_ya_canonica());
    assert_eq!(o.fecha_canonica(-6), None);
  }
}
