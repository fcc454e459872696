use crate::packet::Packet;
use crate::scheduler::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Host {
    Sender,
    Receiver,
    Network,
}

impl From<Entity> for Host {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::Sender => Host::Sender,
            Entity::Receiver => Host::Receiver,
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Host::Sender => "Sender",
            Host::Receiver => "Receiver",
            Host::Network => "Network",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    /// Start of run: the full message string (sender) or empty (receiver).
    AppInit,
    /// Application handed a message to the sending entity.
    DataSubmitted,
    /// The sending entity refused the message; it will be offered again.
    SenderBusy,
    PacketSent,
    PacketArrived,
    /// Receiving entity passed a message up to its application.
    DataDelivered,
    Timeout,
    PacketLost,
    PacketCorrupted,
    AnimationTick,
    Log,
}

impl EventName {
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::AppInit => "app init",
            EventName::DataSubmitted => "data submitted",
            EventName::SenderBusy => "sender busy",
            EventName::PacketSent => "packet sent",
            EventName::PacketArrived => "packet arrived",
            EventName::DataDelivered => "data delivered",
            EventName::Timeout => "timeout",
            EventName::PacketLost => "packet lost",
            EventName::PacketCorrupted => "packet corrupted",
            EventName::AnimationTick => "animation tick",
            EventName::Log => "log line",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EventData {
    None,
    /// Snapshot of a packet at the moment of the event.
    Packet(Packet),
    Text(String),
    Animation { packet: Packet, position: u32 },
}

/// One record of the observer stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverEvent {
    pub name: EventName,
    pub host: Host,
    /// Simulated time the event was produced at.
    pub time: f64,
    pub data: EventData,
}

impl ObserverEvent {
    pub fn new(name: EventName, host: impl Into<Host>, time: f64, data: EventData) -> Self {
        Self {
            name,
            host: host.into(),
            time,
            data,
        }
    }

    pub fn packet(name: EventName, host: impl Into<Host>, time: f64, packet: &Packet) -> Self {
        Self::new(name, host, time, EventData::Packet(packet.clone()))
    }

    pub fn text(name: EventName, host: impl Into<Host>, time: f64, text: impl Into<String>) -> Self {
        Self::new(name, host, time, EventData::Text(text.into()))
    }

    pub fn log(time: f64, line: impl Into<String>) -> Self {
        Self::text(EventName::Log, Host::Network, time, line)
    }
}

impl fmt::Display for ObserverEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == EventName::Log {
            if let EventData::Text(line) = &self.data {
                return f.write_str(line);
            }
        }

        write!(
            f,
            "[{:8.2}] {:<16} @ {:<9}",
            self.time,
            self.name.as_str(),
            self.host
        )?;
        match &self.data {
            EventData::None => Ok(()),
            EventData::Packet(packet) => write!(f, ": {packet}"),
            EventData::Text(text) => write!(f, ": '{text}'"),
            EventData::Animation { packet, position } => {
                write!(f, ": {packet} at step {position}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_from_entity() {
        assert_eq!(Host::from(Entity::Sender), Host::Sender);
        assert_eq!(Host::from(Entity::Receiver), Host::Receiver);
    }

    #[test]
    fn test_display_packet_event() {
        let event = ObserverEvent::packet(
            EventName::PacketSent,
            Entity::Sender,
            1.5,
            &Packet::sealed(0, "a"),
        );
        assert_eq!(
            event.to_string(),
            "[    1.50] packet sent      @ Sender   : Pkt(seq=0, payload='a', checksum=97)"
        );
    }

    #[test]
    fn test_display_log_event_is_verbatim() {
        let event = ObserverEvent::log(3.0, "STATS: 4 packets sent");
        assert_eq!(event.to_string(), "STATS: 4 packets sent");
    }

    #[test]
    fn test_serializes_as_tagged_record() {
        let event = ObserverEvent::text(EventName::DataDelivered, Host::Receiver, 2.0, "b");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["name"], "data_delivered");
        assert_eq!(json["host"], "Receiver");
        assert_eq!(json["data"]["type"], "text");
        assert_eq!(json["data"]["value"], "b");
    }
}
