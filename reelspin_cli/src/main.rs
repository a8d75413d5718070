use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reelspin_core::{
    verify_outcomes, Clock, MachineConfig, ProvablyFairRng, RandomSource, SpinController,
    SpinResult, StdRandom, SystemClock, VirtualClock, REEL_COUNT,
};
use reelspin_shared::{SimulationSummary, SpinReport, VerifyReport};

type Source = Box<dyn RandomSource + Send>;

#[derive(Parser)]
#[command(name = "reelspin", about = "Driver for the three-reel slot machine core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Machine config as JSON; built-in defaults when absent
    #[arg(long, env = "REELSPIN_CONFIG")]
    config: Option<PathBuf>,
    /// Secret server seed for provably-fair draws
    #[arg(long, env = "SERVER_SEED", default_value = "dev-server-seed")]
    server_seed: String,
    #[arg(long, default_value = "demo-seed")]
    client_seed: String,
    /// Nonce of the first spin
    #[arg(long, default_value_t = 1)]
    nonce: u64,
    #[arg(long, value_enum, default_value_t = RngKind::Fair)]
    rng: RngKind,
    /// Seed for `--rng std`; entropy when absent
    #[arg(long)]
    seed: Option<u64>,
    /// Frame interval in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum RngKind {
    /// HMAC-SHA256 stream from server seed, client seed and nonce
    Fair,
    /// rand's StdRng
    Std,
}

#[derive(Subcommand)]
enum Commands {
    /// Run spins on a virtual clock and print each outcome
    Spin {
        #[arg(long, default_value_t = 1)]
        count: u64,
        /// Print JSON reports, one per line
        #[arg(long)]
        json: bool,
    },
    /// Run spins in real time, ticking once per frame
    Play {
        #[arg(long, default_value_t = 1)]
        spins: u64,
    },
    /// Estimate return-to-player over many spins
    Simulate {
        #[arg(long, default_value_t = 10_000)]
        spins: u64,
    },
    /// Export spin reports to a CSV file
    ExportCsv {
        path: PathBuf,
        #[arg(long, default_value_t = 100)]
        spins: u64,
    },
    /// Check a published symbol triple against the seeds
    Verify {
        #[arg(long)]
        nonce: u64,
        /// Symbol indices in reel order, e.g. `1,1,0`
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        symbols: Vec<u8>,
    },
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<MachineConfig> {
        let Some(path) = &self.config else {
            return Ok(MachineConfig::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Ok(MachineConfig::from_json_str(&raw)?)
    }

    fn source(&self) -> Source {
        match self.rng {
            RngKind::Fair => Box::new(ProvablyFairRng::new(
                &self.server_seed,
                &self.client_seed,
                self.nonce,
            )),
            RngKind::Std => Box::new(StdRandom(match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            })),
        }
    }

    /// Nonce behind the `spin`-th cycle, when draws are provably fair.
    fn nonce_of(&self, spin: u64) -> Option<u64> {
        match self.rng {
            RngKind::Fair => Some(self.nonce + spin),
            RngKind::Std => None,
        }
    }

    fn machine<C: Clock>(&self, clock: C) -> anyhow::Result<SpinController<Source, C>> {
        Ok(SpinController::new(self.load_config()?, self.source(), clock)?)
    }

    /// Drives `count` cycles on a virtual clock, handing each result to `each`.
    fn run_headless(
        &self,
        count: u64,
        mut each: impl FnMut(u64, SpinResult) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        let mut machine = self.machine(VirtualClock::new())?;
        for spin in 0..count {
            let Some(result) = machine.run_cycle(self.frame_ms) else {
                bail!("spin {spin} did not settle; is --frame-ms zero?");
            };
            each(spin, result)?;
        }
        Ok(())
    }
}

fn symbol_triple(symbols: &[u8]) -> anyhow::Result<[u8; REEL_COUNT]> {
    match <[u8; REEL_COUNT]>::try_from(symbols) {
        Ok(triple) => Ok(triple),
        Err(_) => bail!("expected {REEL_COUNT} symbols, got {}", symbols.len()),
    }
}

fn to_report(result: &SpinResult, nonce: Option<u64>) -> SpinReport {
    SpinReport {
        ts: Utc::now(),
        nonce,
        symbols: result.symbol_indices().to_vec(),
        double_flags: result.double_flags.to_vec(),
        payout: result.payout,
        label: result.label.clone(),
        balance: result.balance,
    }
}

async fn play(cli: &Cli, spins: u64) -> anyhow::Result<()> {
    let mut machine = cli.machine(SystemClock::new())?;
    machine.on_result(|r| info!(label = %r.label, balance = r.balance, "result available"));
    let mut frames = tokio::time::interval(Duration::from_millis(cli.frame_ms.max(1)));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    for _ in 0..spins {
        machine.request_spin();
        loop {
            frames.tick().await;
            if let Some(result) = machine.tick() {
                let names: Vec<&str> = result.symbols.iter().map(|s| s.name()).collect();
                println!("{} {} (balance {})", names.join(" | "), result.label, result.balance);
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Spin { count, json } => {
            if matches!(cli.rng, RngKind::Fair) {
                let seed_hash = ProvablyFairRng::new(&cli.server_seed, "", 0).server_seed_hash_hex();
                info!(server_seed_hash = %seed_hash, "committed server seed");
            }
            cli.run_headless(*count, |spin, result| {
                if *json {
                    println!("{}", serde_json::to_string(&to_report(&result, cli.nonce_of(spin)))?);
                } else {
                    println!(
                        "#{:>4} {:?} {} (balance {})",
                        spin + 1,
                        result.symbol_indices(),
                        result.label,
                        result.balance
                    );
                }
                Ok(())
            })?;
        }
        Commands::Play { spins } => play(&cli, *spins).await?,
        Commands::Simulate { spins } => {
            let cost = cli.load_config()?.spin_cost;
            let mut summary = SimulationSummary::default();
            cli.run_headless(*spins, |_, result| {
                summary.record(cost, result.payout, result.balance);
                Ok(())
            })?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            println!("rtp={:.4} hit_rate={:.4}", summary.rtp(), summary.hit_rate());
        }
        Commands::ExportCsv { path, spins } => {
            let mut wtr = csv::Writer::from_path(path)?;
            wtr.write_record(["ts", "nonce", "symbols", "double_flags", "payout", "label", "balance"])?;
            cli.run_headless(*spins, |spin, result| {
                let r = to_report(&result, cli.nonce_of(spin));
                wtr.write_record(&[
                    r.ts.to_rfc3339(),
                    r.nonce.map(|n| n.to_string()).unwrap_or_default(),
                    r.symbols_csv(),
                    format!("{:?}", r.double_flags),
                    r.payout.to_string(),
                    r.label,
                    r.balance.to_string(),
                ])?;
                Ok(())
            })?;
            wtr.flush()?;
            println!("Exported {} rows to {}", spins, path.display());
        }
        Commands::Verify { nonce, symbols } => {
            let symbols = symbol_triple(symbols)?;
            let report = VerifyReport {
                server_seed_hash: ProvablyFairRng::new(&cli.server_seed, &cli.client_seed, *nonce)
                    .server_seed_hash_hex(),
                nonce: *nonce,
                expected: symbols.to_vec(),
                matches: verify_outcomes(&cli.server_seed, &cli.client_seed, *nonce, &symbols),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
