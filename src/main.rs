use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rdt_sim::metrics::{install_prometheus, render_metrics};
use rdt_sim::observer::{self, PlaybackControl};
use rdt_sim::protocol::{ProtocolKind, DEFAULT_RETRANSMIT_TIMEOUT};
use rdt_sim::simulator::{SimulationConfig, Simulator};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Stop-and-wait protocol simulator")]
struct Cli {
    /// Number of messages to simulate
    #[arg(short = 'n', long = "nmsgs", default_value_t = 20)]
    nmsgs: u32,

    /// Average time between messages from the sender's application [>0.0]
    #[arg(short = 'f', long = "freq", default_value_t = 1000.0)]
    freq: f64,

    /// Packet loss probability [0.0, 1.0), 0 means no loss
    #[arg(short = 'l', long = "lossprob", default_value_t = 0.0)]
    lossprob: f64,

    /// Packet corruption probability [0.0, 1.0), 0 means no corruption
    #[arg(short = 'c', long = "corruptprob", default_value_t = 0.0)]
    corruptprob: f64,

    /// Wall-clock seconds to wait between events [0.0, 3600.0]
    ///
    /// Every dispatched event is paced, including the 0.01s retries of a
    /// message offered while the sender is still waiting for an ACK.
    #[arg(short = 'p', long = "pause", default_value_t = 1.0)]
    pause: f64,

    /// More log output (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Entity pair to run: stop-and-wait or passthrough
    #[arg(long, default_value_t = ProtocolKind::StopAndWait)]
    protocol: ProtocolKind,

    /// Print the observer event stream instead of the protocol trace
    #[arg(long)]
    observe: bool,

    /// Animate transit in this many steps (deterministic transit times)
    #[arg(long)]
    animation_steps: Option<u32>,

    /// Sender retransmission timeout, in simulated seconds
    #[arg(long, default_value_t = DEFAULT_RETRANSMIT_TIMEOUT)]
    timeout: f64,

    /// Print the final statistics as JSON
    #[arg(long)]
    json: bool,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    metrics: bool,
}

impl Cli {
    fn log_filter(&self) -> EnvFilter {
        let level = if self.quiet {
            "warn"
        } else {
            match (self.observe, self.verbose) {
                (true, 0) => "warn",
                (false, 0) => "info",
                (_, 1) => "debug",
                _ => "trace",
            }
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }

    fn config(&self) -> SimulationConfig {
        let base = match self.animation_steps {
            Some(steps) => SimulationConfig::visualized(self.pause, steps),
            None => SimulationConfig::default().with_pause(self.pause),
        };

        let config = base
            .with_message_count(self.nmsgs)
            .with_mean_interarrival(self.freq)
            .with_loss_probability(self.lossprob)
            .with_corruption_probability(self.corruptprob)
            .with_retransmit_timeout(self.timeout)
            .with_protocol(self.protocol);

        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_target(false)
        .without_time()
        .init();

    if cli.metrics {
        install_prometheus().context("failed to install metrics recorder")?;
    }

    let config = cli.config();
    let mut simulator = Simulator::new(config.clone()).context("invalid configuration")?;

    println!("Running simulator with the following parameters:\n");
    println!("\tverbose     = {}", cli.verbose);
    println!("{}", config.describe());
    println!("\n********** GO **********\n");

    let printer = if cli.observe {
        let (sink, mut stream) = observer::channel();
        let control = PlaybackControl::new(config.pause_delay());
        simulator = simulator.with_observer(sink).with_control(control);

        Some(tokio::spawn(async move {
            while let Some(event) = stream.next().await {
                println!("{event}");
            }
        }))
    } else {
        None
    };

    let stats = tokio::task::spawn_blocking(move || simulator.run())
        .await
        .context("simulation thread panicked")??;

    if let Some(printer) = printer {
        printer.await.context("observer task panicked")?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    if cli.metrics {
        if let Some(text) = render_metrics() {
            println!("{text}");
        }
    }

    Ok(())
}
