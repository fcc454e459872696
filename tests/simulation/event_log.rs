//! Captures a run's observer stream for after-the-fact assertions

#![allow(dead_code)]

use rdt_sim::observer::{self, EventData, EventName, Host, ObserverEvent};
use rdt_sim::packet::Packet;
use rdt_sim::protocol::{RdtReceiver, RdtSender};
use rdt_sim::simulator::{SimulationConfig, SimulationResult, SimulationStats, Simulator};

pub struct EventLog {
    pub events: Vec<ObserverEvent>,
}

impl EventLog {
    /// Run `config` with the configured protocol and record everything
    pub fn capture(config: SimulationConfig) -> (SimulationResult<SimulationStats>, EventLog) {
        let (sink, mut stream) = observer::channel();
        let result = Simulator::new(config).and_then(|sim| sim.with_observer(sink).run());
        (result, EventLog { events: stream.drain() })
    }

    /// Same as [`EventLog::capture`] with caller-supplied entities
    pub fn capture_with(
        config: SimulationConfig,
        sender: Box<dyn RdtSender>,
        receiver: Box<dyn RdtReceiver>,
    ) -> (SimulationResult<SimulationStats>, EventLog) {
        let (sink, mut stream) = observer::channel();
        let result =
            Simulator::new(config).and_then(|sim| sim.with_observer(sink).run_with(sender, receiver));
        (result, EventLog { events: stream.drain() })
    }

    pub fn named(&self, name: EventName) -> impl Iterator<Item = &ObserverEvent> {
        self.events.iter().filter(move |e| e.name == name)
    }

    pub fn count(&self, name: EventName) -> usize {
        self.named(name).count()
    }

    /// Packets that popped out of the channel at `host`, in arrival order
    pub fn arrivals_at(&self, host: Host) -> Vec<(f64, Packet)> {
        self.named(EventName::PacketArrived)
            .filter(|e| e.host == host)
            .filter_map(|e| match &e.data {
                EventData::Packet(packet) => Some((e.time, packet.clone())),
                _ => None,
            })
            .collect()
    }

    /// Delivered messages, in delivery order
    pub fn deliveries(&self) -> Vec<String> {
        self.named(EventName::DataDelivered)
            .filter_map(|e| match &e.data {
                EventData::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// For every delivery, the receiver-side arrival that triggered it
    pub fn packets_behind_deliveries(&self) -> Vec<Packet> {
        let mut last_arrival = None;
        let mut behind = Vec::new();
        for event in &self.events {
            match (&event.name, event.host, &event.data) {
                (EventName::PacketArrived, Host::Receiver, EventData::Packet(packet)) => {
                    last_arrival = Some(packet.clone());
                }
                (EventName::DataDelivered, _, _) => {
                    if let Some(packet) = last_arrival.take() {
                        behind.push(packet);
                    }
                }
                _ => {}
            }
        }
        behind
    }

    pub fn is_time_ordered(&self) -> bool {
        self.events.windows(2).all(|w| w[0].time <= w[1].time)
    }
}
