use crate::channel::{Channel, CorruptionMode, NetworkVerdict};
use crate::metrics;
use crate::observer::{EventData, EventName, EventSink, Host, ObserverEvent, PlaybackControl};
use crate::packet::Packet;
use crate::protocol::{RdtReceiver, RdtSender, ReceiverLink, SenderLink};
use crate::scheduler::{Entity, Event, EventId, EventKind, Scheduler};
use crate::simulator::config::SimulationConfig;
use crate::simulator::error::{SimulationError, SimulationResult};
use crate::simulator::stats::SimulationStats;
use crate::timer::Timers;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Gap left after the last in-flight arrival before a refused message is
/// offered again.
const BUSY_RETRY_GAP: f64 = 0.01;

/// Wall-clock interval between control polls while paused.
const PAUSED_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns one run: builds the world, feeds application traffic and dispatches
/// events until the quota is delivered or nothing is left to happen.
///
/// ```no_run
/// use rdt_sim::simulator::{SimulationConfig, Simulator};
///
/// let config = SimulationConfig::new(10, 50.0).with_loss_probability(0.1);
/// let stats = Simulator::new(config)?.run()?;
/// assert_eq!(stats.received, stats.sent);
/// # Ok::<(), rdt_sim::simulator::SimulationError>(())
/// ```
#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
    observer: Option<EventSink>,
    control: Option<PlaybackControl>,
}

impl Simulator {
    /// Validate `config` and prepare a simulator. Nothing runs yet.
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: None,
            control: None,
        })
    }

    /// Mirror every observable event into `sink`.
    pub fn with_observer(mut self, sink: EventSink) -> Self {
        self.observer = Some(sink);
        self
    }

    /// Let an observer pause, step and pace the run.
    pub fn with_control(mut self, control: PlaybackControl) -> Self {
        self.control = Some(control);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run with the entity pair selected by the configuration.
    pub fn run(&self) -> SimulationResult<SimulationStats> {
        let (sender, receiver) = self.config.protocol.build(self.config.retransmit_timeout);
        self.run_with(sender, receiver)
    }

    /// Run with caller-supplied entities against the same channel and clock.
    pub fn run_with(
        &self,
        mut sender: Box<dyn RdtSender>,
        mut receiver: Box<dyn RdtReceiver>,
    ) -> SimulationResult<SimulationStats> {
        let run_metrics = metrics::RunMetrics::start(self.config.protocol.to_string());
        let mut world = World::new(&self.config, self.observer.clone());

        world.announce();
        world.schedule_next_message();

        let quota = u64::from(self.config.message_count);
        let mut outcome = Ok(());
        while world.stats.messages_received < quota {
            if !self.ready_for_next_event() {
                continue;
            }

            let Some((id, event)) = world.scheduler.pop_next() else {
                break;
            };
            metrics::set_simulated_time(event.time);

            if let Err(err) = world.dispatch(id, event, sender.as_mut(), receiver.as_mut()) {
                outcome = Err(err);
                break;
            }
        }

        let stats = world.finish(self.config.message_count);
        run_metrics.complete();
        outcome.map(|()| stats)
    }

    /// Poll playback control between iterations.
    ///
    /// Returns `false` while paused with no pending step; simulated time is
    /// untouched either way.
    fn ready_for_next_event(&self) -> bool {
        let delay = match &self.control {
            Some(control) if control.is_paused() => {
                if control.take_step() {
                    return true;
                }
                std::thread::sleep(PAUSED_POLL_INTERVAL);
                return false;
            }
            Some(control) => control.pause_delay(),
            None => self.config.pause_delay(),
        };

        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        true
    }
}

/// Mutable state of a single run.
struct World {
    scheduler: Scheduler,
    channel: Channel,
    timers: Timers,
    rng: StdRng,
    stats: SimulationStats,
    observer: Option<EventSink>,
    message_count: u32,
    mean_interarrival: f64,
    /// Messages accepted so far; also indexes the next message.
    generated: u32,
}

impl World {
    fn new(config: &SimulationConfig, observer: Option<EventSink>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            scheduler: Scheduler::new(),
            channel: Channel::new(
                config.channel.clone(),
                config.loss_probability,
                config.corruption_probability,
            ),
            timers: Timers::new(),
            rng,
            stats: SimulationStats::default(),
            observer,
            message_count: config.message_count,
            mean_interarrival: config.mean_interarrival,
            generated: 0,
        }
    }

    fn emit(&self, event: ObserverEvent) {
        if let Some(sink) = &self.observer {
            sink.emit(event);
        }
    }

    fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Tell the observer what each application starts with.
    fn announce(&self) {
        let script: String = (0..self.message_count).map(message_for).collect();
        self.emit(ObserverEvent::text(EventName::AppInit, Host::Sender, 0.0, script));
        self.emit(ObserverEvent::text(EventName::AppInit, Host::Receiver, 0.0, ""));
    }

    /// Schedule the next application message after an exponential gap.
    fn schedule_next_message(&mut self) {
        if self.generated >= self.message_count {
            return;
        }

        let u: f64 = self.rng.gen();
        let gap = -self.mean_interarrival * (1.0 - u).ln();
        self.scheduler.insert(Event::new(
            self.now() + gap,
            EventKind::ApplicationDataReady,
            Entity::Sender,
        ));
    }

    fn dispatch(
        &mut self,
        id: EventId,
        event: Event,
        sender: &mut dyn RdtSender,
        receiver: &mut dyn RdtReceiver,
    ) -> SimulationResult<()> {
        let Event { time, kind, entity, .. } = event;

        match kind {
            EventKind::ApplicationDataReady => {
                if entity != Entity::Sender {
                    return Err(self.violation(format!(
                        "application data addressed to {entity}"
                    )));
                }
                self.on_application_data(sender);
            }
            EventKind::PacketArrived(packet) => {
                tracing::info!("[{:8.2}] L3->L4 @ {:<9}: {}", time, entity, packet);
                self.emit(ObserverEvent::packet(
                    EventName::PacketArrived,
                    entity,
                    time,
                    &packet,
                ));
                match entity {
                    Entity::Sender => sender.on_packet_arrived(packet, &mut self.port(entity)),
                    Entity::Receiver => {
                        receiver.on_packet_arrived(packet, &mut self.port(entity))
                    }
                }
            }
            EventKind::TimerExpired => {
                if entity != Entity::Sender {
                    return Err(self.violation(format!(
                        "timer expiry delivered to {entity}, which has no timer handler"
                    )));
                }
                if !self.timers.fired(entity, id) {
                    return Err(self.violation(format!(
                        "timer event {id} fired but is not the active {entity} timer"
                    )));
                }

                tracing::info!("[{:8.2}] TIMEOUT @ {:<9}", time, entity);
                self.stats.timeouts += 1;
                metrics::record_timeout();
                self.emit(ObserverEvent::new(
                    EventName::Timeout,
                    entity,
                    time,
                    EventData::None,
                ));
                sender.on_timer_expired(&mut self.port(entity));
            }
            EventKind::NetworkEffect { arrival, .. } => self.on_network_effect(arrival),
            EventKind::AnimationTick { packet, position } => {
                self.emit(ObserverEvent::new(
                    EventName::AnimationTick,
                    entity,
                    time,
                    EventData::Animation { packet, position },
                ));
            }
        }
        Ok(())
    }

    fn on_application_data(&mut self, sender: &mut dyn RdtSender) {
        let now = self.now();
        let message = message_for(self.generated).to_string();

        if sender.submit(&message, &mut self.port(Entity::Sender)) {
            tracing::info!("[{:8.2}] L5->L4 @ {:<9}: '{}'", now, Entity::Sender, message);
            self.generated += 1;
            self.stats.messages_sent += 1;
            self.stats.sent.push_str(&message);
            metrics::record_message_submitted();
            self.emit(ObserverEvent::text(
                EventName::DataSubmitted,
                Host::Sender,
                now,
                message,
            ));
            self.schedule_next_message();
            return;
        }

        let retry_at = self
            .scheduler
            .latest_arrival_any()
            .map_or(now, |latest| latest.max(now))
            + BUSY_RETRY_GAP;
        tracing::debug!(
            "[{:8.2}] sender busy, offering '{}' again at {:.03}",
            now,
            message,
            retry_at
        );
        self.stats.busy_rejections += 1;
        metrics::record_sender_busy();
        self.emit(ObserverEvent::text(
            EventName::SenderBusy,
            Host::Sender,
            now,
            message,
        ));
        self.scheduler.insert(Event::new(
            retry_at,
            EventKind::ApplicationDataReady,
            Entity::Sender,
        ));
    }

    fn on_network_effect(&mut self, arrival: EventId) {
        let now = self.now();
        match self
            .channel
            .apply_network_effect(&mut self.scheduler, &mut self.rng, arrival)
        {
            NetworkVerdict::Lost { packet } => {
                tracing::warn!("[{:8.2}] PKT_LOST     @ Network  : {}", now, packet);
                self.stats.packets_lost += 1;
                metrics::record_packet_lost();
                self.emit(ObserverEvent::packet(
                    EventName::PacketLost,
                    Host::Network,
                    now,
                    &packet,
                ));
            }
            NetworkVerdict::Corrupted { packet, mode } => {
                tracing::warn!(
                    "[{:8.2}] PKT_CORRUPT  @ Network  : {} ({})",
                    now,
                    packet,
                    corruption_label(&mode)
                );
                self.stats.packets_corrupted += 1;
                metrics::record_packet_corrupted(corruption_label(&mode));
                self.emit(ObserverEvent::packet(
                    EventName::PacketCorrupted,
                    Host::Network,
                    now,
                    &packet,
                ));
            }
            NetworkVerdict::Delivered => {}
        }
    }

    fn transmit(&mut self, from: Entity, packet: &Packet) {
        let now = self.now();
        tracing::info!("[{:8.2}] L4->L3 @ {:<9}: {}", now, from, packet);

        self.stats.packets_sent += 1;
        metrics::record_packet_sent(from.name());
        self.emit(ObserverEvent::packet(EventName::PacketSent, from, now, packet));
        self.channel
            .transmit(&mut self.scheduler, &mut self.rng, from, packet);
    }

    fn deliver(&mut self, message: &str) {
        let now = self.now();
        tracing::info!("[{:8.2}] L4->L5 @ {:<9}: '{}'", now, Entity::Receiver, message);

        self.stats.messages_received += 1;
        self.stats.received.push_str(message);
        metrics::record_message_delivered();
        self.emit(ObserverEvent::text(
            EventName::DataDelivered,
            Host::Receiver,
            now,
            message,
        ));
    }

    fn port(&mut self, entity: Entity) -> Port<'_> {
        Port {
            world: self,
            entity,
        }
    }

    fn violation(&self, message: String) -> SimulationError {
        tracing::error!("[{:8.2}] INTERNAL PANIC: {}", self.now(), message);
        SimulationError::InvariantViolation(message)
    }

    /// Close the run: fold in late counters and report.
    fn finish(mut self, message_count: u32) -> SimulationStats {
        self.stats.final_time = self.now();
        self.stats.timer_misuse = self.timers.misuse_count();
        metrics::record_timer_misuse(self.stats.timer_misuse);

        let scheduler_stats = self.scheduler.stats();
        tracing::debug!(
            "scheduler: {} inserted, {} dispatched, {} cancelled, {} still pending",
            scheduler_stats.total_inserted,
            scheduler_stats.total_dispatched,
            scheduler_stats.total_cancelled,
            scheduler_stats.live_pending()
        );

        for line in self.stats.summary_lines(message_count) {
            tracing::info!("{}", line);
            self.emit(ObserverEvent::log(self.stats.final_time, line));
        }
        self.stats
    }
}

/// The world as seen by one entity during a single callback.
struct Port<'w> {
    world: &'w mut World,
    entity: Entity,
}

impl SenderLink for Port<'_> {
    fn send(&mut self, packet: &Packet) {
        self.world.transmit(self.entity, packet);
    }

    fn start_timer(&mut self, duration: f64) {
        let world = &mut *self.world;
        world
            .timers
            .start(&mut world.scheduler, self.entity, duration);
    }

    fn stop_timer(&mut self) {
        let world = &mut *self.world;
        world.timers.stop(&mut world.scheduler, self.entity);
    }

    fn now(&self) -> f64 {
        self.world.now()
    }
}

impl ReceiverLink for Port<'_> {
    fn send(&mut self, packet: &Packet) {
        self.world.transmit(self.entity, packet);
    }

    fn deliver(&mut self, message: &str) {
        self.world.deliver(message);
    }

    fn now(&self) -> f64 {
        self.world.now()
    }
}

/// The `index`-th application message: the alphabet, cycled.
fn message_for(index: u32) -> char {
    // index % 26 always fits in a u8
    char::from(b'a' + (index % 26) as u8)
}

fn corruption_label(mode: &CorruptionMode) -> &'static str {
    match mode {
        CorruptionMode::Payload { .. } => "payload",
        CorruptionMode::Sequence => "sequence",
        CorruptionMode::Checksum => "checksum",
    }
}
