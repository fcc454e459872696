use crate::scheduler::types::{Entity, Event, EventId, ScheduledKey, SchedulerStats};
use std::collections::{BinaryHeap, HashMap};

/// Time-ordered event queue and the simulation clock.
///
/// The heap only holds `(time, id)` keys; event bodies live in `events`
/// until they are popped. Cancelling flips the stored `cancelled` flag and
/// the entry is discarded lazily when its key reaches the top of the heap,
/// so there is never a search through the heap.
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<ScheduledKey>,
    events: HashMap<EventId, Event>,
    next_id: u64,
    now: f64,
    stats: SchedulerStats,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time: the time of the last event handed out.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Insert an event. Callers must not schedule before [`Scheduler::now`].
    pub fn insert(&mut self, event: Event) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;

        tracing::debug!(
            "[{:8.2}] INSERT_EVENT: {} scheduled for {:.03}",
            self.now,
            event.kind.name(),
            event.time
        );

        self.heap.push(ScheduledKey {
            time: event.time,
            id,
        });
        self.events.insert(id, event);
        self.stats.total_inserted += 1;
        id
    }

    /// Remove and return the earliest event that is not cancelled,
    /// advancing the clock to its time.
    pub fn pop_next(&mut self) -> Option<(EventId, Event)> {
        while let Some(key) = self.heap.pop() {
            let Some(event) = self.events.remove(&key.id) else {
                continue;
            };

            if event.cancelled {
                self.stats.cancelled_skipped += 1;
                continue;
            }

            self.now = event.time;
            self.stats.total_dispatched += 1;
            tracing::debug!("[{:8.2}] NEXT_EVENT: {}", self.now, event);
            return Some((key.id, event));
        }
        None
    }

    /// Flag a pending event so it is never dispatched.
    ///
    /// Returns `false` when the event is no longer pending or was already
    /// cancelled.
    pub fn cancel(&mut self, id: EventId) -> bool {
        match self.events.get_mut(&id) {
            Some(event) if !event.cancelled => {
                event.cancelled = true;
                self.stats.total_cancelled += 1;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    /// Mutable access to a pending event, used to impair an in-flight packet.
    pub fn get_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.get_mut(&id)
    }

    /// Latest pending packet arrival addressed to `entity`.
    pub fn latest_arrival(&self, entity: Entity) -> Option<f64> {
        self.live_events()
            .filter(|event| event.kind.is_arrival() && event.entity == entity)
            .map(|event| event.time)
            .max_by(f64::total_cmp)
    }

    /// Latest pending packet arrival in either direction.
    pub fn latest_arrival_any(&self) -> Option<f64> {
        self.live_events()
            .filter(|event| event.kind.is_arrival())
            .map(|event| event.time)
            .max_by(f64::total_cmp)
    }

    /// Pending events that have not been cancelled, in no particular order.
    pub fn live_events(&self) -> impl Iterator<Item = &Event> {
        self.events.values().filter(|event| !event.cancelled)
    }

    /// Number of stored events, cancelled ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// True when no event would ever be dispatched again.
    pub fn is_exhausted(&self) -> bool {
        self.live_events().next().is_none()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats.clone()
    }
}
