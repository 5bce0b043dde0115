// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process topic dispatcher. Each subscriber owns a bounded queue;
//! overflow drops the oldest buffered event for that subscriber only, and
//! the bus logs a drop-warning at most once per second per subscriber.

use crate::event::Event;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

const DEFAULT_CAPACITY: usize = 256;

struct Queue {
    buffer: Mutex<VecDeque<Event>>,
    notify: Notify,
    capacity: usize,
    last_drop_warning_at: AtomicI64,
}

struct Subscriber {
    id: u64,
    queue: Arc<Queue>,
}

/// A live subscription. Dropping it unregisters the subscriber.
pub struct Subscription {
    id: u64,
    bus: EventBus,
    queue: Arc<Queue>,
}

impl Subscription {
    /// Wait for the next event. The bus is a long-lived in-process object;
    /// callers that need a bounded wait should wrap this in
    /// `tokio::time::timeout`.
    pub async fn recv(&mut self) -> Event {
        loop {
            if let Some(event) = self.queue.buffer.lock().unwrap().pop_front() {
                return event;
            }
            self.queue.notify.notified().await;
        }
    }

    /// Non-blocking variant: `None` if nothing is queued right now.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.queue.buffer.lock().unwrap().pop_front()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}

#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn subscribe(&self) -> Subscription {
        self.subscribe_with_capacity(DEFAULT_CAPACITY)
    }

    pub fn subscribe_with_capacity(&self, capacity: usize) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) as u64;
        let queue = Arc::new(Queue {
            buffer: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
            notify: Notify::new(),
            capacity: capacity.max(1),
            last_drop_warning_at: AtomicI64::new(0),
        });
        self.subscribers.lock().unwrap().push(Subscriber {
            id,
            queue: queue.clone(),
        });
        Subscription {
            id,
            bus: self.clone(),
            queue,
        }
    }

    fn unsubscribe(&self, id: u64) {
        self.subscribers.lock().unwrap().retain(|s| s.id != id);
    }

    /// Publish one event to every current subscriber, in registration
    /// order. A subscriber whose queue is already at capacity has its
    /// oldest buffered event dropped to make room for this one — the
    /// publisher never blocks.
    pub fn publish(&self, event: Event) {
        let subscribers = self.subscribers.lock().unwrap();
        for subscriber in subscribers.iter() {
            let mut buffer = subscriber.queue.buffer.lock().unwrap();
            if buffer.len() >= subscriber.queue.capacity {
                buffer.pop_front();
                warn_once_per_second(&subscriber.queue, subscriber.id);
            }
            buffer.push_back(event.clone());
            drop(buffer);
            subscriber.queue.notify.notify_one();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

fn warn_once_per_second(queue: &Queue, subscriber_id: u64) {
    let now = now_unix_seconds();
    let last = queue.last_drop_warning_at.load(Ordering::Relaxed);
    if now > last
        && queue
            .last_drop_warning_at
            .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    {
        tracing::warn!(subscriber_id, "event bus subscriber queue full, dropping oldest event");
    }
}

fn now_unix_seconds() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
