use reelspin_core::{MachineConfig, ProvablyFairRng, SpinController, VirtualClock};

fn main() {
    // Example end-to-end cycle on a virtual clock, one frame every 16ms
    let rng = ProvablyFairRng::new("example-server-seed", "example-client-seed", 1);
    let seed_hash = rng.server_seed_hash_hex();
    let mut machine = SpinController::new(MachineConfig::default(), rng, VirtualClock::new())
        .expect("default config is valid");
    match machine.run_cycle(16) {
        Some(result) => println!(
            "server_seed_hash={} symbols={:?} label={:?} balance={}",
            seed_hash,
            result.symbol_indices(),
            result.label,
            result.balance
        ),
        None => println!("cycle did not settle"),
    }
}
