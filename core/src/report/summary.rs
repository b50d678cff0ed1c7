//! Human-readable aggregate summary of a finished run.

use crate::engine::SimulationConfig;
use crate::report::ReportError;
use crate::telemetry::SummaryStats;
use std::io::Write;

/// Write the aggregate summary: horizon, per-stage means, counts by class,
/// and average sojourn times.
pub fn write_summary<W: Write>(
    out: &mut W,
    config: &SimulationConfig,
    stats: &SummaryStats,
) -> Result<(), ReportError> {
    writeln!(out, "=== DELIVERY CYCLE SIMULATION SUMMARY ===")?;
    writeln!(out)?;
    writeln!(out, "Simulation horizon       : {:.2} units", config.horizon)?;
    writeln!(out)?;

    writeln!(out, "Stages (mean service times):")?;
    writeln!(out, "  PLACED           -> {:.2}", config.stage_times.placed)?;
    writeln!(out, "  PACKED           -> {:.2}", config.stage_times.packed)?;
    writeln!(out, "  DISPATCHED       -> {:.2}", config.stage_times.dispatched)?;
    writeln!(
        out,
        "  OUT_FOR_DELIVERY -> {:.2}",
        config.stage_times.out_for_delivery
    )?;
    writeln!(out)?;

    writeln!(out, "Total orders arrived     : {}", stats.total_arrived)?;
    writeln!(out, "  Express orders         : {}", stats.arrived_express)?;
    writeln!(out, "  Normal orders          : {}", stats.arrived_normal)?;
    writeln!(out, "Total cancelled          : {}", stats.cancelled)?;
    writeln!(out, "  Cancelled express      : {}", stats.cancelled_express)?;
    writeln!(out, "  Cancelled normal       : {}", stats.cancelled_normal)?;
    writeln!(out)?;

    writeln!(out, "Total delivered          : {}", stats.delivered)?;
    writeln!(out, "  Delivered express      : {}", stats.delivered_express)?;
    writeln!(out, "  Delivered normal       : {}", stats.delivered_normal)?;
    writeln!(out)?;

    writeln!(out, "Average time in system (from arrival to delivery)")?;
    writeln!(
        out,
        "  Overall                : {:.3} time units",
        stats.avg_sojourn()
    )?;
    writeln!(
        out,
        "  Express only           : {:.3} time units",
        stats.avg_sojourn_express()
    )?;
    writeln!(
        out,
        "  Normal only            : {:.3} time units",
        stats.avg_sojourn_normal()
    )?;
    Ok(())
}
