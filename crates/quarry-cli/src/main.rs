//! `quarry` – hunter/prey pursuit simulation loop.
//!
//! This binary is the glue around the spatial core.  It:
//!
//! 1. Loads `~/.quarry/config.toml` (all fields optional; the defaults are
//!    the classic setup: hunter "pdias" on blue chasing "lalmeida" on red).
//! 2. Builds the shared in-process transform registry, optionally with a
//!    propagation delay to exercise the degraded-lookup paths.
//! 3. Spawns the hunter and prey agents and prints both team rosters.
//! 4. Ticks at a fixed rate: query the hunter's pose, report distances to
//!    every prey frame, apply one bounded motion step each.
//! 5. Exits cleanly on Ctrl-C.

mod config;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tracing::warn;

use quarry_agents::{BestEffort, ControlledAgent, Roster};
use quarry_registry::{LocalPoseStore, PoseStore};
use quarry_types::TeamColor;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            // First run: persist the defaults so they can be edited.
            let cfg = config::SimConfig::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  First run – default config written to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("  Using defaults (could not write config: {})", e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::SimConfig::default()
        }
    };

    // ── Shared transform registry ─────────────────────────────────────────
    let store: Arc<dyn PoseStore> = if cfg.propagation_delay_ms > 0 {
        Arc::new(LocalPoseStore::with_propagation_delay(Duration::from_millis(
            cfg.propagation_delay_ms,
        )))
    } else {
        Arc::new(LocalPoseStore::new())
    };
    let recovery = BestEffort::new(Duration::from_millis(cfg.recovery_pause_ms));

    // ── Agents ────────────────────────────────────────────────────────────
    let mut hunter = ControlledAgent::spawn(&cfg.hunter_frame, Arc::clone(&store))
        .await
        .with_recovery(recovery);
    if let Err(err) = hunter.set_team(&cfg.hunter_team) {
        warn!(error = %err, "hunter keeps unset team");
    }

    let mut prey = Vec::with_capacity(cfg.prey_frames.len());
    for frame in &cfg.prey_frames {
        let mut agent = ControlledAgent::spawn(frame, Arc::clone(&store))
            .await
            .with_recovery(recovery);
        if let Err(err) = agent.set_team(&cfg.prey_team) {
            warn!(error = %err, frame = %frame, "prey keeps unset team");
        }
        prey.push(agent);
    }

    // ── Rosters ───────────────────────────────────────────────────────────
    let hunter_roster = Roster::new(
        &cfg.hunter_team,
        [cfg.hunter_frame.clone()],
        Arc::clone(&store),
    );
    let prey_roster = Roster::new(&cfg.prey_team, cfg.prey_frames.clone(), Arc::clone(&store));
    print_roster(&hunter_roster);
    print_roster(&prey_roster);

    // ── Pursuit loop ──────────────────────────────────────────────────────
    let mut ticker = tokio::time::interval(tick_period(cfg.tick_hz));
    println!(
        "\n  Running at {} Hz – Ctrl-C to stop.\n",
        cfg.tick_hz.to_string().bold()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("{}", "Ctrl-C received – leaving the hunt.".yellow().bold());
                break;
            }
            _ = ticker.tick() => {
                let pose = hunter.pose().await;
                println!(
                    "{}  x = {:>7.3}  y = {:>7.3}  yaw = {:>7.3}",
                    hunter.frame().bold(),
                    pose.position.x,
                    pose.position.y,
                    pose.yaw(),
                );

                for target in &prey {
                    let distance = hunter.agent().distance_to_frame(target.frame()).await;
                    println!(
                        "  distance {} -> {}: {:.3}",
                        hunter.frame(),
                        target.frame(),
                        distance
                    );
                }

                hunter.step(cfg.step_displacement, cfg.step_turn).await;
                for target in &prey {
                    // Prey flee: half the hunter's stride, turning away.
                    target.step(cfg.step_displacement * 0.5, -cfg.step_turn).await;
                }
            }
        }
    }
}

/// Tick period for a given rate, guarding against a zero rate.
fn tick_period(tick_hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(tick_hz.max(1)))
}

fn print_banner() {
    println!();
    println!("  {}", "QUARRY".bold());
    println!("  {}", "hunter/prey pursuit simulation".dimmed());
    println!();
}

/// Render a roster, coloured by its team.
fn print_roster(roster: &Roster) {
    let dump = roster.to_string();
    let coloured = match roster.team() {
        Some(TeamColor::Red) => dump.red(),
        Some(TeamColor::Green) => dump.green(),
        Some(TeamColor::Blue) => dump.blue(),
        None => dump.normal(),
    };
    print!("{}", coloured);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_period_matches_rate() {
        assert_eq!(tick_period(10), Duration::from_millis(100));
        assert_eq!(tick_period(1), Duration::from_secs(1));
    }

    #[test]
    fn tick_period_guards_against_zero() {
        assert_eq!(tick_period(0), Duration::from_secs(1));
    }
}
