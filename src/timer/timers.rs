//! Per-entity retransmission timers.
//!
//! A timer is nothing more than a `TimerExpired` event sitting in the
//! scheduler. `Timers` remembers which event belongs to which entity so it
//! can cancel it; the scheduler stays the only owner of the event itself.

use crate::scheduler::{Entity, Event, EventId, EventKind, Scheduler};

#[derive(Debug, Default)]
pub struct Timers {
    sender: Option<EventId>,
    receiver: Option<EventId>,
    misuse: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the entity's timer to fire `duration` simulated seconds from now.
    ///
    /// At most one timer per entity: starting a second one is logged and
    /// ignored, and the running timer keeps its original expiry.
    pub fn start(&mut self, scheduler: &mut Scheduler, entity: Entity, duration: f64) -> bool {
        tracing::debug!(
            "[{:8.2}] START_TIMER: for {} duration {}",
            scheduler.now(),
            entity,
            duration
        );

        if self.slot(entity).is_some() {
            self.misuse += 1;
            tracing::warn!(
                "[{:8.2}] attempt to start a timer that is already started ({})",
                scheduler.now(),
                entity
            );
            return false;
        }

        let id = scheduler.insert(Event::new(
            scheduler.now() + duration,
            EventKind::TimerExpired,
            entity,
        ));
        *self.slot_mut(entity) = Some(id);
        true
    }

    /// Cancel the entity's running timer.
    ///
    /// Stopping a timer that is not running is logged and otherwise ignored.
    pub fn stop(&mut self, scheduler: &mut Scheduler, entity: Entity) -> bool {
        tracing::debug!("[{:8.2}] STOP_TIMER: for {}", scheduler.now(), entity);

        match self.slot_mut(entity).take() {
            Some(id) => {
                scheduler.cancel(id);
                true
            }
            None => {
                self.misuse += 1;
                tracing::warn!(
                    "[{:8.2}] unable to cancel {} timer, it wasn't running",
                    scheduler.now(),
                    entity
                );
                false
            }
        }
    }

    /// Clear the slot once its event has been dispatched.
    ///
    /// Returns `false` if `id` is not the entity's active timer.
    pub fn fired(&mut self, entity: Entity, id: EventId) -> bool {
        let slot = self.slot_mut(entity);
        if *slot == Some(id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    pub fn is_running(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// Expiry time of the entity's running timer.
    pub fn expiry(&self, scheduler: &Scheduler, entity: Entity) -> Option<f64> {
        self.slot(entity)
            .and_then(|id| scheduler.get(id))
            .map(|event| event.time)
    }

    /// Usage errors absorbed so far (double start, stop while idle).
    pub fn misuse_count(&self) -> u64 {
        self.misuse
    }

    fn slot(&self, entity: Entity) -> Option<EventId> {
        match entity {
            Entity::Sender => self.sender,
            Entity::Receiver => self.receiver,
        }
    }

    fn slot_mut(&mut self, entity: Entity) -> &mut Option<EventId> {
        match entity {
            Entity::Sender => &mut self.sender,
            Entity::Receiver => &mut self.receiver,
        }
    }
}
