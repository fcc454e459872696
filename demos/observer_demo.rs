//! Drive a lossy run from one thread and render it from another.
//!
//! The renderer pauses the simulation at the first timeout, releases three
//! events one at a time, then lets it run to completion.

use rdt_sim::observer::{self, EventName, PlaybackControl};
use rdt_sim::simulator::{SimulationConfig, Simulator};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let config = SimulationConfig::visualized(0.02, 6)
        .with_message_count(8)
        .with_loss_probability(0.2)
        .with_corruption_probability(0.1)
        .with_seed(2024);

    let (sink, mut stream) = observer::channel();
    let control = PlaybackControl::new(Duration::from_secs_f64(config.pause));
    let simulator = Simulator::new(config)?
        .with_observer(sink)
        .with_control(control.clone());

    let renderer = std::thread::spawn(move || {
        let mut stepped = false;
        while let Some(event) = stream.next_blocking() {
            if event.name != EventName::AnimationTick {
                println!("{event}");
            }

            if event.name == EventName::Timeout && !stepped {
                stepped = true;
                println!("-- paused, stepping three events --");
                control.pause();
                for _ in 0..3 {
                    control.step();
                    std::thread::sleep(Duration::from_millis(150));
                }
                println!("-- resuming --");
                control.resume();
            }
        }
    });

    let stats = simulator.run()?;
    drop(simulator);
    renderer
        .join()
        .map_err(|_| anyhow::anyhow!("renderer thread panicked"))?;

    println!("\n{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
