//! The typed listener registry.
//!
//! [`EventHooks`] is populated once at process start, turned into [`EventHandlers`] (one channel
//! and dispatch task per registered listener), and from then on only the cloneable
//! [`EventProducers`] bundle travels through the system. Registration order is preserved: emitters
//! publish to producers in the order their listeners were registered.
use std::{future::Future, pin::Pin, sync::Arc};

use tokio::task::JoinHandle;

use crate::events::{EventHandler, EventProducer, Handler, OrderSettledEvent, OrderSettlementFailedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub order_settled: Vec<EventProducer<OrderSettledEvent>>,
    pub settlement_failed: Vec<EventProducer<OrderSettlementFailedEvent>>,
}

pub struct EventHandlers {
    pub on_order_settled: Vec<EventHandler<OrderSettledEvent>>,
    pub on_settlement_failed: Vec<EventHandler<OrderSettlementFailedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_order_settled =
            hooks.on_order_settled.into_iter().map(|f| EventHandler::new(buffer_size, f)).collect();
        let on_settlement_failed =
            hooks.on_settlement_failed.into_iter().map(|f| EventHandler::new(buffer_size, f)).collect();
        Self { on_order_settled, on_settlement_failed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        for handler in &self.on_order_settled {
            result.order_settled.push(handler.subscribe());
        }
        for handler in &self.on_settlement_failed {
            result.settlement_failed.push(handler.subscribe());
        }
        result
    }

    /// Spawns one dispatch task per registered listener. Each task runs until the last producer
    /// for its channel is dropped; the returned handles let callers wait for that drain.
    pub async fn start_handlers(self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(self.on_order_settled.len() + self.on_settlement_failed.len());
        for handler in self.on_order_settled {
            handles.push(tokio::spawn(async move {
                handler.start_handler().await;
            }));
        }
        for handler in self.on_settlement_failed {
            handles.push(tokio::spawn(async move {
                handler.start_handler().await;
            }));
        }
        handles
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_order_settled: Vec<Handler<OrderSettledEvent>>,
    pub on_settlement_failed: Vec<Handler<OrderSettlementFailedEvent>>,
}

impl EventHooks {
    /// Registers a listener for `OrderSettledEvent`. May be called repeatedly; every registered
    /// listener receives every event, each on its own channel.
    pub fn on_order_settled<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderSettledEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_order_settled.push(Arc::new(f));
        self
    }

    /// Registers a listener for `OrderSettlementFailedEvent`.
    pub fn on_settlement_failed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderSettlementFailedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_settlement_failed.push(Arc::new(f));
        self
    }
}
