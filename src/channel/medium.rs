use crate::channel::types::{ChannelConfig, CorruptionMode, InFlight, NetworkVerdict, TransitMode};
use crate::packet::Packet;
use crate::scheduler::{Entity, Event, EventId, EventKind, Scheduler};
use rand::Rng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The unreliable medium between the two entities.
///
/// The channel keeps no per-packet state of its own: everything in flight
/// is an event in the scheduler, and ordering is recovered by looking at
/// the arrivals already pending there.
#[derive(Debug, Clone)]
pub struct Channel {
    config: ChannelConfig,
    loss_probability: f64,
    corruption_probability: f64,
}

impl Channel {
    pub fn new(config: ChannelConfig, loss_probability: f64, corruption_probability: f64) -> Self {
        Self {
            config,
            loss_probability,
            corruption_probability,
        }
    }

    /// A channel that never loses or corrupts anything.
    pub fn perfect(config: ChannelConfig) -> Self {
        Self::new(config, 0.0, 0.0)
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn loss_probability(&self) -> f64 {
        self.loss_probability
    }

    pub fn corruption_probability(&self) -> f64 {
        self.corruption_probability
    }

    /// Hand a packet from `from` to the channel.
    ///
    /// Schedules the arrival at the peer no earlier than any arrival already
    /// pending for it, plus a network-effect event halfway through the
    /// transit window. In animated mode one tick per step is scheduled too.
    pub fn transmit<R: Rng + ?Sized>(
        &self,
        scheduler: &mut Scheduler,
        rng: &mut R,
        from: Entity,
        packet: &Packet,
    ) -> InFlight {
        let now = scheduler.now();
        let to = from.peer();
        let copy = packet.clone();

        let last_arrival = scheduler
            .latest_arrival(to)
            .map_or(now, |latest| latest.max(now));
        let arrival_time = last_arrival + self.transit_duration(rng);

        if let TransitMode::Animated {
            steps,
            step_interval,
        } = self.config.transit
        {
            for step in 1..=steps {
                let position = match from {
                    Entity::Sender => step,
                    Entity::Receiver => steps - step,
                };
                scheduler.insert(Event::new(
                    now + f64::from(step) * step_interval,
                    EventKind::AnimationTick {
                        packet: copy.clone(),
                        position,
                    },
                    from,
                ));
            }
        }

        let arrival = scheduler.insert(Event::new(
            arrival_time,
            EventKind::PacketArrived(copy.clone()),
            to,
        ));

        let effect_time = now + (arrival_time - now) / 2.0;
        let effect = scheduler.insert(Event::new(
            effect_time,
            EventKind::NetworkEffect {
                packet: copy,
                arrival,
            },
            from,
        ));

        tracing::debug!(
            "[{:8.2}] TOLAYER3: {} -> {} arrives at {:.03}, effect at {:.03}",
            now,
            from,
            to,
            arrival_time,
            effect_time
        );

        InFlight {
            arrival,
            effect,
            arrival_time,
            effect_time,
        }
    }

    /// Decide the fate of the packet delivered by `arrival`.
    ///
    /// Loss cancels the arrival and skips the corruption draw. Corruption
    /// mutates the copy the arrival event will hand over.
    pub fn apply_network_effect<R: Rng + ?Sized>(
        &self,
        scheduler: &mut Scheduler,
        rng: &mut R,
        arrival: EventId,
    ) -> NetworkVerdict {
        if rng.gen::<f64>() < self.loss_probability {
            let packet = scheduler
                .get(arrival)
                .and_then(|event| event.packet().cloned());
            if !scheduler.cancel(arrival) {
                tracing::debug!("network effect for {} found no pending arrival", arrival);
                return NetworkVerdict::Delivered;
            }
            return NetworkVerdict::Lost {
                packet: packet.unwrap_or_else(|| Packet::new(0, "")),
            };
        }

        if rng.gen::<f64>() < self.corruption_probability {
            let draw = rng.gen::<f64>();
            let Some(Event {
                kind: EventKind::PacketArrived(packet),
                cancelled: false,
                ..
            }) = scheduler.get_mut(arrival)
            else {
                tracing::debug!("network effect for {} found no pending arrival", arrival);
                return NetworkVerdict::Delivered;
            };
            let mode = self.corrupt_packet(packet, draw, rng);
            return NetworkVerdict::Corrupted {
                packet: packet.clone(),
                mode,
            };
        }

        NetworkVerdict::Delivered
    }

    /// Mutate `packet` according to the corruption draw `draw` in `[0, 1)`.
    pub fn corrupt_packet<R: Rng + ?Sized>(
        &self,
        packet: &mut Packet,
        draw: f64,
        rng: &mut R,
    ) -> CorruptionMode {
        let thresholds = self.config.corruption;

        if draw < thresholds.payload && !packet.payload.is_empty() {
            let mut chars: Vec<char> = packet.payload.chars().collect();
            let position = rng.gen_range(0..chars.len());
            let replacement = char::from(LETTERS[rng.gen_range(0..LETTERS.len())]);
            chars[position] = replacement;
            packet.payload = chars.into_iter().collect();
            CorruptionMode::Payload {
                position,
                replacement,
            }
        } else if draw < thresholds.sequence {
            packet.sequence_number = self.config.corrupt_sequence_number;
            CorruptionMode::Sequence
        } else {
            packet.checksum = Some(packet.checksum.map_or(1, |c| c.wrapping_add(1)));
            CorruptionMode::Checksum
        }
    }

    fn transit_duration<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.config.transit {
            TransitMode::Uniform if self.config.max_transit > self.config.min_transit => {
                rng.gen_range(self.config.min_transit..self.config.max_transit)
            }
            TransitMode::Uniform => self.config.min_transit,
            TransitMode::Animated {
                steps,
                step_interval,
            } => step_interval * f64::from(steps + 1),
        }
    }
}
