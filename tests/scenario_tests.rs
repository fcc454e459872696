//! End-to-end scenarios for the stop-and-wait simulator
//!
//! Run with: cargo test --test scenario_tests -- --nocapture

#[path = "simulation/mod.rs"]
mod simulation;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rdt_sim::channel::{Channel, ChannelConfig, CorruptionMode};
use rdt_sim::observer::{EventData, EventName, Host};
use rdt_sim::packet::Packet;
use rdt_sim::protocol::{
    ProtocolKind, RdtReceiver, RdtSender, ReceiverLink, SenderLink, StopAndWaitReceiver,
    StopAndWaitSender,
};
use rdt_sim::simulator::{SimulationConfig, SimulationError, Simulator};
use simulation::{EventLog, NetworkProfile, TrialCollector};
use std::sync::Arc;

fn alphabet(n: usize) -> String {
    (b'a'..=b'z').map(char::from).cycle().take(n).collect()
}

/// Scenario A: a clean channel delivers everything, in order, once.
#[test]
fn test_scenario_a_perfect_channel() {
    for seed in 0..5 {
        let config = SimulationConfig::new(50, 100.0).with_seed(seed);
        let stats = Simulator::new(config).unwrap().run().unwrap();

        assert_eq!(stats.messages_sent, 50);
        assert_eq!(stats.messages_received, 50);
        assert_eq!(stats.sent, alphabet(50));
        assert_eq!(stats.received, alphabet(50));
        assert_eq!(stats.timeouts, 0);
    }
}

#[test]
fn test_scenario_a_content_independent_of_jitter() {
    let first = Simulator::new(SimulationConfig::new(50, 100.0).with_seed(1))
        .unwrap()
        .run()
        .unwrap();
    let second = Simulator::new(SimulationConfig::new(50, 100.0).with_seed(99))
        .unwrap()
        .run()
        .unwrap();

    assert_ne!(first.final_time, second.final_time);
    assert_eq!(first.received, second.received);
}

/// Scenario B: 10% loss, retransmission recovers at least 96% of messages.
#[test]
fn test_scenario_b_lossy_channel() {
    let config = NetworkProfile::lossy().apply(SimulationConfig::new(50, 100.0));
    let collector = TrialCollector::new(config).run(100, 20);
    let summary = collector.summary();

    println!(
        "lossy: {} runs, {}/{} delivered, {} lost, {} timeouts",
        summary.runs,
        summary.messages_received,
        summary.messages_sent,
        summary.packets_lost,
        summary.timeouts
    );

    for stats in collector.results() {
        assert!(stats.messages_received as f64 >= 0.96 * 50.0);
    }
    assert!(summary.delivery_ratio() >= 0.96);
    assert_eq!(summary.out_of_order_runs, 0);
    assert!(summary.packets_lost > 0);
    assert!(summary.timeouts > 0);
}

/// Sender that tries to re-arm its timer with a much shorter duration.
struct ImpatientSender {
    expiries: Arc<Mutex<Vec<f64>>>,
}

impl RdtSender for ImpatientSender {
    fn submit(&mut self, message: &str, link: &mut dyn SenderLink) -> bool {
        link.send(&Packet::sealed(0, message));
        link.start_timer(10.0);
        link.start_timer(1.0);
        true
    }

    fn on_packet_arrived(&mut self, _packet: Packet, _link: &mut dyn SenderLink) {}

    fn on_timer_expired(&mut self, link: &mut dyn SenderLink) {
        self.expiries.lock().push(link.now());
    }
}

/// Receiver that never answers or delivers.
struct DeafReceiver;

impl RdtReceiver for DeafReceiver {
    fn on_packet_arrived(&mut self, _packet: Packet, _link: &mut dyn ReceiverLink) {}
}

/// Scenario C: a second start is rejected and the first expiry stands.
#[test]
fn test_scenario_c_timer_double_start() {
    let expiries = Arc::new(Mutex::new(Vec::new()));
    let sender = ImpatientSender {
        expiries: expiries.clone(),
    };

    let (result, log) = EventLog::capture_with(
        SimulationConfig::new(1, 5.0).with_seed(8),
        Box::new(sender),
        Box::new(DeafReceiver),
    );
    let stats = result.unwrap();

    let submitted_at = log.named(EventName::DataSubmitted).next().unwrap().time;
    let expiries = expiries.lock();
    assert_eq!(expiries.len(), 1);
    assert!((expiries[0] - submitted_at - 10.0).abs() < 1e-9);
    assert_eq!(stats.timer_misuse, 1);
    assert_eq!(stats.timeouts, 1);
}

/// Scenario D: arrivals at an entity follow send order even when random
/// transit times would cross.
#[test]
fn test_scenario_d_no_reordering() {
    let config = SimulationConfig::new(200, 0.05)
        .with_protocol(ProtocolKind::Passthrough)
        .with_channel(ChannelConfig::with_transit_range(0.5, 20.0))
        .with_seed(4);
    let (result, log) = EventLog::capture(config);
    let stats = result.unwrap();

    assert_eq!(stats.messages_received, 200);
    assert_eq!(stats.received, stats.sent);

    let arrivals = log.arrivals_at(Host::Receiver);
    let payloads: String = arrivals.iter().map(|(_, p)| p.payload.as_str()).collect();
    assert_eq!(payloads, alphabet(200));
    assert!(arrivals.windows(2).all(|w| w[0].0 <= w[1].0));
}

#[test]
fn test_corrupted_payload_never_delivered() {
    for seed in 0..10 {
        let config = NetworkProfile::noisy()
            .apply(SimulationConfig::new(30, 20.0))
            .with_seed(seed);
        let (result, log) = EventLog::capture(config);
        let stats = result.unwrap();

        assert_eq!(stats.received, stats.sent);
        for packet in log.packets_behind_deliveries() {
            assert!(packet.verify(), "delivered from invalid {packet}");
        }
    }
}

#[test]
fn test_passthrough_never_delivers_corruption() {
    let config = SimulationConfig::new(100, 1.0)
        .with_protocol(ProtocolKind::Passthrough)
        .with_corruption_probability(0.5)
        .with_seed(21);
    let (result, log) = EventLog::capture(config);
    let stats = result.unwrap();

    assert!(stats.packets_corrupted > 0);
    assert!(stats.messages_received < 100);
    assert!(log.packets_behind_deliveries().iter().all(Packet::verify));
}

#[test]
fn test_at_most_one_packet_outstanding() {
    let config = NetworkProfile::degraded()
        .apply(SimulationConfig::new(40, 2.0))
        .with_seed(77);
    let (result, log) = EventLog::capture(config);
    let stats = result.unwrap();
    assert!(stats.busy_rejections > 0);

    // Between two accepted submissions the sender must have seen a valid ACK.
    let mut acked_since_submit = true;
    for event in &log.events {
        match (&event.name, event.host, &event.data) {
            (EventName::DataSubmitted, _, _) => {
                assert!(acked_since_submit, "submission at {} while busy", event.time);
                acked_since_submit = false;
            }
            (EventName::PacketArrived, Host::Sender, EventData::Packet(packet))
                if packet.verify() && packet.is_ack() =>
            {
                acked_since_submit = true;
            }
            _ => {}
        }
    }
    assert_eq!(
        log.count(EventName::SenderBusy) as u64,
        stats.busy_rejections
    );
}

#[test]
fn test_duplicate_data_reacked_not_redelivered() {
    let config = NetworkProfile::hostile()
        .apply(SimulationConfig::new(30, 50.0))
        .with_seed(5);
    let (result, log) = EventLog::capture(config);
    let stats = result.unwrap();

    assert!(stats.timeouts > 0);
    assert_eq!(log.deliveries().len(), 30);
    assert_eq!(log.deliveries().concat(), alphabet(30));

    // Retransmissions mean the receiver saw more valid data packets than it
    // delivered; every one of them was acknowledged.
    let valid_at_receiver = log
        .arrivals_at(Host::Receiver)
        .into_iter()
        .filter(|(_, p)| p.verify())
        .count();
    assert!(valid_at_receiver >= 30);
}

#[test]
fn test_entities_run_with_explicit_pair() {
    let config = SimulationConfig::new(10, 30.0)
        .with_loss_probability(0.3)
        .with_seed(12);
    let stats = Simulator::new(config)
        .unwrap()
        .run_with(
            Box::new(StopAndWaitSender::new(10.0)),
            Box::new(StopAndWaitReceiver::new()),
        )
        .unwrap();
    assert_eq!(stats.received, alphabet(10));
}

#[test]
fn test_lost_packets_are_never_corrupted() {
    let config = SimulationConfig::new(20, 5.0)
        .with_protocol(ProtocolKind::Passthrough)
        .with_loss_probability(0.999_999)
        .with_corruption_probability(0.999_999)
        .with_seed(13);
    let (result, log) = EventLog::capture(config);
    let stats = result.unwrap();

    assert_eq!(stats.packets_sent, 20);
    assert_eq!(stats.packets_lost, 20);
    assert_eq!(stats.packets_corrupted, 0);
    assert_eq!(log.count(EventName::PacketCorrupted), 0);
    assert!(stats.received.is_empty());
}

#[test]
fn test_loss_and_corruption_are_exclusive_per_packet() {
    let config = NetworkProfile::hostile()
        .apply(SimulationConfig::new(60, 20.0))
        .with_seed(44);
    let (result, log) = EventLog::capture(config);
    let stats = result.unwrap();
    assert!(stats.packets_lost > 0 && stats.packets_corrupted > 0);

    // Both verdicts come from the same network-effect event, so a packet hit
    // by both would show up as a pair at the same instant.
    for pair in log.events.windows(2) {
        let both = pair[0].name == EventName::PacketLost
            && pair[1].name == EventName::PacketCorrupted;
        assert!(
            !(both && pair[0].time == pair[1].time),
            "packet at {} was lost and corrupted",
            pair[0].time
        );
    }
}

#[test]
fn test_zero_transit_channel_rejected() {
    let config = SimulationConfig::new(200, 1.0)
        .with_protocol(ProtocolKind::Passthrough)
        .with_loss_probability(0.5)
        .with_corruption_probability(0.5)
        .with_channel(ChannelConfig::with_transit_range(0.0, 0.0))
        .with_seed(1);
    let (result, log) = EventLog::capture(config);

    assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
    assert!(log.events.is_empty());
}

#[test]
fn test_invalid_configuration_rejected() {
    for config in [
        SimulationConfig::default().with_loss_probability(1.0),
        SimulationConfig::default().with_corruption_probability(1.0),
        SimulationConfig::default().with_mean_interarrival(0.0),
        SimulationConfig::default().with_pause(-1.0),
    ] {
        let (result, log) = EventLog::capture(config);
        assert!(matches!(result, Err(SimulationError::InvalidConfig(_))));
        assert!(log.events.is_empty());
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let config = NetworkProfile::degraded()
        .apply(SimulationConfig::new(25, 10.0))
        .with_seed(31337);

    let (first, first_log) = EventLog::capture(config.clone());
    let (second, second_log) = EventLog::capture(config);

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(first_log.events, second_log.events);
}

#[test]
fn test_observer_stream_ordered_and_complete() {
    let config = NetworkProfile::degraded()
        .apply(SimulationConfig::new(12, 10.0))
        .with_seed(9);
    let (result, log) = EventLog::capture(config);
    let stats = result.unwrap();

    assert!(log.is_time_ordered());
    assert_eq!(log.count(EventName::AppInit), 2);
    assert_eq!(log.count(EventName::PacketSent) as u64, stats.packets_sent);
    assert_eq!(log.count(EventName::PacketLost) as u64, stats.packets_lost);
    assert_eq!(
        log.count(EventName::PacketCorrupted) as u64,
        stats.packets_corrupted
    );
    assert_eq!(log.count(EventName::Timeout) as u64, stats.timeouts);
    assert_eq!(log.count(EventName::Log), 4);
}

#[test]
fn test_every_corruption_breaks_verification() {
    let channel = Channel::perfect(ChannelConfig::default());
    let mut rng = StdRng::seed_from_u64(0);

    for draw in [0.1, 0.8, 0.95] {
        for _ in 0..50 {
            let original = Packet::sealed(1, "q");
            let mut packet = original.clone();
            assert!(packet.verify());

            let mode = channel.corrupt_packet(&mut packet, draw, &mut rng);
            match mode {
                CorruptionMode::Payload { replacement, .. } if replacement == 'q' => {
                    assert_eq!(packet, original);
                }
                _ => assert!(!packet.verify(), "{mode:?} left {packet} valid"),
            }
        }
    }
}
