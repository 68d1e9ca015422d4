//! Chain Reaction headless runner
//!
//! Drives the simulation at a fixed 60 Hz without a renderer, logging each
//! sequencer transition, then prints the final snapshot as JSON.
//!
//! Usage: `chain-reaction [config.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use chain_reaction::consts::FRAME_DT;
    use chain_reaction::sim::{ControllerState, Simulation, Transition};
    use chain_reaction::SimConfig;

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            SimConfig::from_json(&std::fs::read_to_string(path)?)?
        }
        None => SimConfig::default(),
    };
    let seconds = parse_duration(args.next().as_deref())?;

    let mut sim = Simulation::new(config)?;
    let frames = (seconds / FRAME_DT).ceil() as u64;
    log::info!("Running {} frames ({}s at 60 Hz)", frames, seconds);

    for _ in 0..frames {
        let report = sim.tick(FRAME_DT)?;
        for t in &report.transitions {
            if let Transition::Applied { from, to } = t {
                if from != to {
                    log::info!(
                        "t={:.3}s frame {}: {:?} -> {:?}",
                        sim.elapsed(),
                        sim.frame(),
                        from,
                        to
                    );
                }
            }
        }
    }

    if sim.controller_state() != ControllerState::Ball2Rolling {
        log::warn!("Chain reaction stalled in {:?}", sim.controller_state());
    }

    println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    Ok(())
}

/// Run duration in seconds; defaults to 12 and must be finite and positive
#[cfg(not(target_arch = "wasm32"))]
fn parse_duration(arg: Option<&str>) -> Result<f32, Box<dyn std::error::Error>> {
    let seconds: f32 = match arg {
        Some(s) => s.parse()?,
        None => 12.0,
    };
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(format!("run duration must be positive seconds, got {seconds}").into());
    }
    Ok(seconds)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start`; the renderer drives `ChainReaction`
}
