use ciclos::{CycleService, EngineConfig, InMemoryOrderStore, OrderStore};
use envio_domain::{CanonicalDate, OrderStatus, NO_DISPONIBLE};
use serde_json::json;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

/// Pequeño menú interactivo para operar el motor de ciclos sobre un almacén
/// en memoria sembrado con pedidos de demostración.
///
/// Opciones soportadas:
/// 1) Ver pedidos (tabla con id, estado y valor crudo de fecha)
/// 2) Pedidos urgentes de empaque para una fecha dada
/// 3) Pedidos en la ventana de envío vigente
/// 4) Revisión de pagos (ciclo vigente y anterior de cada tipo)
/// 5) Migrar fechas legadas a cadenas canónicas
/// 6) Conciliar etiquetas de día de entrega
/// 7) Salir
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let store = Arc::new(InMemoryOrderStore::new());
    seed_demo_orders(&store);
    let service = CycleService::new(store.clone(), EngineConfig::default());

    loop {
        println!("\n== Menú del motor de ciclos ==");
        println!("1) Ver pedidos");
        println!("2) Pedidos urgentes de empaque");
        println!("3) Pedidos en ventana de envío");
        println!("4) Revisión de pagos");
        println!("5) Migrar fechas legadas");
        println!("6) Conciliar etiquetas de día");
        println!("7) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                match store.list_orders().await {
                    Ok(orders) => {
                        println!("\nID                                   | ESTADO            | FECHA CRUDA");
                        println!("--------------------------------------------------------------------------");
                        for o in orders {
                            println!("{} | {:<17} | {}", o.id, o.estado.to_string(), o.fecha_entrega_programada);
                        }
                    }
                    Err(e) => eprintln!("Error listando pedidos: {}", e),
                }
            }
            "2" => {
                let hoy = match prompt_fecha()? {
                    Some(f) => f,
                    None => continue,
                };
                match service.urgent_to_pack(&hoy).await {
                    Ok(urgentes) => {
                        println!("Urgentes de empaque al {}: {}", hoy, urgentes.len());
                        for a in urgentes {
                            println!("  {} → {}", a.order.id, a.fecha_canonica);
                        }
                    }
                    Err(e) => eprintln!("Error en la consulta de urgentes: {}", e),
                }
            }
            "3" => {
                let hoy = match prompt_fecha()? {
                    Some(f) => f,
                    None => continue,
                };
                match service.in_shipment_window(&hoy).await {
                    Ok(en_ventana) => {
                        println!("En ventana de envío al {}: {}", hoy, en_ventana.len());
                        for a in en_ventana {
                            println!("  {} ({}) → {}", a.order.id, a.order.estado, a.fecha_canonica);
                        }
                    }
                    Err(e) => eprintln!("Error en la consulta de envío: {}", e),
                }
            }
            "4" => {
                let hoy = match prompt_fecha()? {
                    Some(f) => f,
                    None => continue,
                };
                match service.payout_review(&hoy).await {
                    Ok(buckets) => {
                        for b in buckets {
                            println!("Ciclo {} con ancla {}, ventana {}: {} pedidos",
                                     b.window.tipo, b.window.anchor, b.window.window, b.orders.len());
                            for a in b.orders {
                                println!("  {} ({}) → {}", a.order.id, a.order.estado, a.fecha_canonica);
                            }
                        }
                    }
                    Err(e) => eprintln!("Error en la revisión de pagos: {}", e),
                }
            }
            "5" => {
                match service.migrate_timestamps().await {
                    Ok(report) => print_report("Migración de fechas", &report),
                    Err(e) => eprintln!("Error en la migración: {}", e),
                }
            }
            "6" => {
                match service.reconcile_weekday_labels().await {
                    Ok(report) => print_report("Conciliación de etiquetas", &report),
                    Err(e) => eprintln!("Error en la conciliación: {}", e),
                }
            }
            "7" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}

fn prompt_fecha() -> io::Result<Option<CanonicalDate>> {
    let s = prompt("Fecha de hoy (YYYY-MM-DD): ")?;
    match CanonicalDate::parse(s.trim()) {
        Ok(f) => Ok(Some(f)),
        Err(e) => {
            eprintln!("{}", e);
            Ok(None)
        }
    }
}

fn print_report(titulo: &str, report: &ciclos::BatchReport) {
    println!("{}: corregidos={} ya_correctos={} sin_resolver={} errores={}",
             titulo, report.corrected, report.already_correct, report.unresolved, report.errors);
    for d in &report.details {
        println!("  {}: {} → {} ({:?})", d.record_id, d.before, d.after, d.outcome);
    }
}

/// Siembra pedidos de demostración con las formas de fecha que el almacén
/// real contiene: canónicas, época, objetos con `seconds`, texto largo en
/// español y valores inutilizables.
fn seed_demo_orders(store: &InMemoryOrderStore) {
    store.create_order(OrderStatus::Pendiente, json!("2026-01-19"), Some("Lunes".into()));
    store.create_order(OrderStatus::Pendiente, json!("2026-01-21"), Some("Martes".into()));
    store.create_order(OrderStatus::Empacado, json!(1_768_867_200), None);
    store.create_order(OrderStatus::Enviado, json!({ "seconds": 1_769_040_000 }), None);
    store.create_order(OrderStatus::Remunerado, json!("17 de enero de 2026"), Some("Sábado".into()));
    store.create_order(OrderStatus::Cancelado, json!("2026-01-15T08:00:00-06:00"), None);
    store.create_order(OrderStatus::Pendiente, json!(null), None);
    println!("Sembrados {} pedidos de demostración (fechas sin canonizar se reportan como {})",
             store.len(), NO_DISPONIBLE);
}
