//! "What-if" replacement of part of the consumption by solar generation.
//!
//! The model is linear: the replaced share of energy is converted to kWh at
//! [`KWH_PER_TJ`](crate::units::KWH_PER_TJ), priced at a flat rate, and the
//! avoided emissions follow the view's average emissions per TJ.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateSummary;
use crate::error::{CoreError, CoreResult};
use crate::units::{KilowattHours, Terajoules, Tonnes};

/// Slider position used when nothing else is configured.
pub const DEFAULT_PERCENTAGE: f64 = 30.0;

/// Inputs of the simulation that do not come from the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Share of consumption replaced, in percent
    pub percentage: f64,
    /// Price of one kWh, in the deployment's currency
    pub unit_price_per_kwh: f64,
}

impl SimulationParams {
    /// Validated parameters. Out-of-range values are rejected, not clamped.
    pub fn new(percentage: f64, unit_price_per_kwh: f64) -> CoreResult<Self> {
        let params = Self {
            percentage,
            unit_price_per_kwh,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=100.0).contains(&self.percentage) {
            return Err(CoreError::InvalidPercentage(self.percentage));
        }
        if !self.unit_price_per_kwh.is_finite() || self.unit_price_per_kwh < 0.0 {
            return Err(CoreError::InvalidUnitPrice(self.unit_price_per_kwh));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationResult {
    pub percentage: f64,
    pub simulated_energy_tj: Terajoules,
    pub simulated_energy_kwh: KilowattHours,
    pub estimated_savings: f64,
    /// `None` when the view has no emission values to derive a ratio from
    pub estimated_co2_reduction: Option<Tonnes>,
}

/// Result of the simulation section: either figures or an explicit
/// "undefined" when there is no energy to replace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SimulationOutcome {
    Computed(SimulationResult),
    Undefined,
}

impl SimulationOutcome {
    pub fn result(&self) -> Option<&SimulationResult> {
        match self {
            SimulationOutcome::Computed(result) => Some(result),
            SimulationOutcome::Undefined => None,
        }
    }
}

/// Run the simulation over a summary.
///
/// Fails with [`CoreError::UndefinedSimulation`] when total energy is zero
/// or has no data, since the emission reduction divides by it.
pub fn simulate(
    summary: &AggregateSummary,
    percentage: f64,
    unit_price_per_kwh: f64,
) -> CoreResult<SimulationResult> {
    let params = SimulationParams::new(percentage, unit_price_per_kwh)?;
    simulate_with(summary, &params)
}

pub fn simulate_with(
    summary: &AggregateSummary,
    params: &SimulationParams,
) -> CoreResult<SimulationResult> {
    params.validate()?;
    let total_energy = match summary.total_energy() {
        Some(total) if total != 0.0 && total.is_finite() => Terajoules(total),
        _ => return Err(CoreError::UndefinedSimulation),
    };

    // p / 100 keeps 100% exactly equal to the total
    let fraction = params.percentage / 100.0;
    let simulated_energy_tj = total_energy * fraction;
    let simulated_energy_kwh = simulated_energy_tj.to_kwh();
    let estimated_savings = simulated_energy_kwh.priced_at(params.unit_price_per_kwh);
    let estimated_co2_reduction = summary
        .total_emissions()
        .map(|emissions| Tonnes(simulated_energy_tj.value() * (emissions / total_energy.value())));

    Ok(SimulationResult {
        percentage: params.percentage,
        simulated_energy_tj,
        simulated_energy_kwh,
        estimated_savings,
        estimated_co2_reduction,
    })
}

/// Like [`simulate_with`], folding the undefined case into an outcome.
pub fn simulate_outcome(
    summary: &AggregateSummary,
    params: &SimulationParams,
) -> CoreResult<SimulationOutcome> {
    match simulate_with(summary, params) {
        Ok(result) => Ok(SimulationOutcome::Computed(result)),
        Err(CoreError::UndefinedSimulation) => Ok(SimulationOutcome::Undefined),
        Err(err) => Err(err),
    }
}
