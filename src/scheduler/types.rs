use crate::packet::Packet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One of the two protocol endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    Sender,
    Receiver,
}

impl Entity {
    /// The entity on the other end of the channel.
    pub fn peer(self) -> Entity {
        match self {
            Entity::Sender => Entity::Receiver,
            Entity::Receiver => Entity::Sender,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Entity::Sender => "Sender",
            Entity::Receiver => "Receiver",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Handle to an event owned by the [`crate::scheduler::Scheduler`].
///
/// Ids are handed out in insertion order, which also makes them the
/// tie-breaker for events scheduled at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub(crate) u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// The entity's retransmission timer went off.
    TimerExpired,
    /// The sender's application layer has a new message.
    ApplicationDataReady,
    /// A packet pops out of the channel at the entity.
    PacketArrived(Packet),
    /// Mid-transit impairment decision for the packet delivered by `arrival`.
    NetworkEffect { packet: Packet, arrival: EventId },
    /// Display-only progress of a packet across the channel.
    AnimationTick { packet: Packet, position: u32 },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::TimerExpired => "TIMER_EXPIRED",
            EventKind::ApplicationDataReady => "APPLICATION_DATA_READY",
            EventKind::PacketArrived(_) => "PACKET_ARRIVED",
            EventKind::NetworkEffect { .. } => "NETWORK_EFFECT",
            EventKind::AnimationTick { .. } => "ANIMATION_TICK",
        }
    }

    pub fn is_arrival(&self) -> bool {
        matches!(self, EventKind::PacketArrived(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Simulated seconds.
    pub time: f64,
    pub kind: EventKind,
    /// Entity the event concerns: the destination for arrivals, the origin
    /// for network effects and animation ticks.
    pub entity: Entity,
    pub cancelled: bool,
}

impl Event {
    pub fn new(time: f64, kind: EventKind, entity: Entity) -> Self {
        Self {
            time,
            kind,
            entity,
            cancelled: false,
        }
    }

    /// Packet carried by the event, if any.
    pub fn packet(&self) -> Option<&Packet> {
        match &self.kind {
            EventKind::PacketArrived(packet)
            | EventKind::NetworkEffect { packet, .. }
            | EventKind::AnimationTick { packet, .. } => Some(packet),
            EventKind::TimerExpired | EventKind::ApplicationDataReady => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Event(entity={}, time={:.03}, type={}",
            self.entity,
            self.time,
            self.kind.name()
        )?;
        match &self.kind {
            EventKind::AnimationTick { packet, position } => {
                write!(f, ", anim_pkt=Pkt(seq={}), pos={}", packet.sequence_number, position)?
            }
            EventKind::NetworkEffect { packet, arrival } => write!(
                f,
                ", net_effect_pkt=Pkt(seq={}), arrival={}",
                packet.sequence_number, arrival
            )?,
            EventKind::PacketArrived(packet) => {
                write!(f, ", packet=Pkt(seq={})", packet.sequence_number)?
            }
            EventKind::TimerExpired | EventKind::ApplicationDataReady => {}
        }
        f.write_str(")")
    }
}

/// Heap entry: the event body lives in the scheduler's storage.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScheduledKey {
    pub time: f64,
    pub id: EventId,
}

impl PartialEq for ScheduledKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledKey {}

impl PartialOrd for ScheduledKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both fields: BinaryHeap is a max-heap and we want the
        // earliest time, then the earliest insertion, on top.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.id.cmp(&self.id))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerStats {
    pub total_inserted: u64,
    pub total_dispatched: u64,
    pub total_cancelled: u64,
    /// Cancelled events discarded while popping.
    pub cancelled_skipped: u64,
}

impl SchedulerStats {
    /// Events still due to be dispatched.
    pub fn live_pending(&self) -> u64 {
        self.total_inserted
            .saturating_sub(self.total_dispatched)
            .saturating_sub(self.total_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_live_pending_excludes_cancelled() {
        let stats = SchedulerStats {
            total_inserted: 10,
            total_dispatched: 4,
            total_cancelled: 3,
            cancelled_skipped: 1,
        };
        assert_eq!(stats.live_pending(), 3);
    }

    #[test]
    fn test_entity_peer() {
        assert_eq!(Entity::Sender.peer(), Entity::Receiver);
        assert_eq!(Entity::Receiver.peer(), Entity::Sender);
    }

    #[test]
    fn test_key_ordering_earliest_first() {
        let mut heap = BinaryHeap::new();
        heap.push(ScheduledKey { time: 3.0, id: EventId(0) });
        heap.push(ScheduledKey { time: 1.0, id: EventId(1) });
        heap.push(ScheduledKey { time: 2.0, id: EventId(2) });

        assert_eq!(heap.pop().map(|k| k.time), Some(1.0));
        assert_eq!(heap.pop().map(|k| k.time), Some(2.0));
        assert_eq!(heap.pop().map(|k| k.time), Some(3.0));
    }

    #[test]
    fn test_key_ties_broken_by_insertion() {
        let mut heap = BinaryHeap::new();
        heap.push(ScheduledKey { time: 5.0, id: EventId(7) });
        heap.push(ScheduledKey { time: 5.0, id: EventId(3) });
        heap.push(ScheduledKey { time: 5.0, id: EventId(5) });

        assert_eq!(heap.pop().map(|k| k.id), Some(EventId(3)));
        assert_eq!(heap.pop().map(|k| k.id), Some(EventId(5)));
        assert_eq!(heap.pop().map(|k| k.id), Some(EventId(7)));
    }

    #[test]
    fn test_event_display() {
        let event = Event::new(
            2.5,
            EventKind::PacketArrived(Packet::sealed(1, "c")),
            Entity::Receiver,
        );
        assert_eq!(
            event.to_string(),
            "Event(entity=Receiver, time=2.500, type=PACKET_ARRIVED, packet=Pkt(seq=1))"
        );
    }

    #[test]
    fn test_event_packet_accessor() {
        let timer = Event::new(1.0, EventKind::TimerExpired, Entity::Sender);
        assert!(timer.packet().is_none());

        let tick = Event::new(
            1.0,
            EventKind::AnimationTick {
                packet: Packet::sealed(0, "a"),
                position: 2,
            },
            Entity::Sender,
        );
        assert_eq!(tick.packet().map(|p| p.payload.as_str()), Some("a"));
    }
}
