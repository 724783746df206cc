//! Altseason index: how broadly alts are outperforming BTC, 0 - 100
//!
//! Strategies are tried in order of preference and the first one whose inputs
//! are present decides the index. Results are never blended across strategies.

use crate::types::{AltseasonMethod, RankedAsset};
use tracing::debug;

/// Asset the alts are measured against
pub const DOMINANT_ASSET_ID: &str = "bitcoin";

/// Number of eligible alts compared, and the ratio denominator
pub const ALT_SAMPLE_SIZE: usize = 50;

/// Stablecoins, wrapped / staked derivatives and BTC itself
pub static DENYLIST: phf::Set<&'static str> = phf::phf_set! {
    "bitcoin",
    "tether",
    "usd-coin",
    "dai",
    "binance-usd",
    "true-usd",
    "pax-dollar",
    "first-digital-usd",
    "ethena-usde",
    "usds",
    "wrapped-bitcoin",
    "steth",
    "weth",
    "wrapped-steth",
    "cbeth",
    "rocket-pool-eth",
    "frax-ether",
    "coinbase-wrapped-btc",
    "leo-token",
    "multi-collateral-dai",
};

/// Whatever upstream data made it through normalization
#[derive(Debug, Clone, Copy, Default)]
pub struct AltseasonInputs<'a> {
    /// Ranked listing, including the dominant asset
    pub assets: Option<&'a [RankedAsset]>,
    pub dominance: Option<f64>,
}

impl<'a> AltseasonInputs<'a> {
    fn dominant(&self) -> Option<&'a RankedAsset> {
        self.assets?.iter().find(|a| a.id == DOMINANT_ASSET_ID)
    }

    /// Top `ALT_SAMPLE_SIZE` listing entries outside the denylist, in rank order
    fn eligible_alts(&self) -> Vec<&'a RankedAsset> {
        self.assets
            .unwrap_or_default()
            .iter()
            .filter(|a| !DENYLIST.contains(a.id.as_str()))
            .take(ALT_SAMPLE_SIZE)
            .collect()
    }
}

/// Final index and the strategy that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AltseasonReading {
    pub index: u8,
    pub method: AltseasonMethod,
}

pub trait AltseasonStrategy: Send + Sync {
    fn method(&self) -> AltseasonMethod;

    fn inputs_available(&self, inputs: &AltseasonInputs<'_>) -> bool;

    /// Raw score before rounding and clamping; `None` when inputs are missing
    fn compute(&self, inputs: &AltseasonInputs<'_>) -> Option<f64>;
}

/// Count of eligible alts whose `figure` is strictly above the dominant asset's
fn count_outperformers(
    inputs: &AltseasonInputs<'_>,
    figure: impl Fn(&RankedAsset) -> Option<f64>,
) -> Option<usize> {
    let benchmark = figure(inputs.dominant()?)?;
    let count = inputs
        .eligible_alts()
        .into_iter()
        .filter(|alt| figure(alt).map_or(false, |v| v > benchmark))
        .count();
    Some(count)
}

fn any_alt_has(inputs: &AltseasonInputs<'_>, figure: impl Fn(&RankedAsset) -> Option<f64>) -> bool {
    inputs.eligible_alts().into_iter().any(|alt| figure(alt).is_some())
}

/// Share of the top 50 alts beating BTC over the trailing window
pub struct OutperformanceRatio;

impl AltseasonStrategy for OutperformanceRatio {
    fn method(&self) -> AltseasonMethod {
        AltseasonMethod::OutperformanceRatio
    }

    fn inputs_available(&self, inputs: &AltseasonInputs<'_>) -> bool {
        inputs
            .dominant()
            .map_or(false, |btc| btc.trailing_change.is_some())
            && any_alt_has(inputs, |a| a.trailing_change)
    }

    fn compute(&self, inputs: &AltseasonInputs<'_>) -> Option<f64> {
        if !self.inputs_available(inputs) {
            return None;
        }
        let count = count_outperformers(inputs, |a| a.trailing_change)?;
        Some(100.0 * count as f64 / ALT_SAMPLE_SIZE as f64)
    }
}

/// ATH-distance ratio (40%) blended with inverted dominance (60%)
pub struct AthBlend;

impl AthBlend {
    pub fn blend(ratio: f64, dominance: f64) -> f64 {
        ratio * 40.0 + ((100.0 - dominance) / 100.0) * 60.0
    }
}

impl AltseasonStrategy for AthBlend {
    fn method(&self) -> AltseasonMethod {
        AltseasonMethod::AthBlend
    }

    fn inputs_available(&self, inputs: &AltseasonInputs<'_>) -> bool {
        inputs.dominance.is_some()
            && inputs.dominant().map_or(false, |btc| btc.ath_change.is_some())
            && any_alt_has(inputs, |a| a.ath_change)
    }

    fn compute(&self, inputs: &AltseasonInputs<'_>) -> Option<f64> {
        if !self.inputs_available(inputs) {
            return None;
        }
        let dominance = inputs.dominance?;
        let count = count_outperformers(inputs, |a| a.ath_change)?;
        let ratio = count as f64 / ALT_SAMPLE_SIZE as f64;
        Some(Self::blend(ratio, dominance))
    }
}

/// Linear proxy: ~70% dominance maps near 0, ~30% to the high 50s
pub struct DominanceProxy;

impl AltseasonStrategy for DominanceProxy {
    fn method(&self) -> AltseasonMethod {
        AltseasonMethod::DominanceProxy
    }

    fn inputs_available(&self, inputs: &AltseasonInputs<'_>) -> bool {
        inputs.dominance.is_some()
    }

    fn compute(&self, inputs: &AltseasonInputs<'_>) -> Option<f64> {
        inputs.dominance.map(|d| 100.0 - d * 1.4)
    }
}

/// Ordered strategy list; the first applicable strategy wins
pub struct AltseasonChain {
    strategies: Vec<Box<dyn AltseasonStrategy>>,
}

impl Default for AltseasonChain {
    fn default() -> Self {
        Self::new(vec![
            Box::new(OutperformanceRatio),
            Box::new(AthBlend),
            Box::new(DominanceProxy),
        ])
    }
}

impl AltseasonChain {
    pub fn new(strategies: Vec<Box<dyn AltseasonStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn evaluate(&self, inputs: &AltseasonInputs<'_>) -> Option<AltseasonReading> {
        for strategy in &self.strategies {
            let method = strategy.method();
            if !strategy.inputs_available(inputs) {
                debug!("Altseason strategy {} skipped: inputs unavailable", method.as_str());
                continue;
            }

            match strategy.compute(inputs).and_then(clamp_index) {
                Some(index) => return Some(AltseasonReading { index, method }),
                None => debug!("Altseason strategy {} produced no value", method.as_str()),
            }
        }

        None
    }
}

/// Round half away from zero, then clamp into 0 - 100; `None` for NaN
pub fn clamp_index(raw: f64) -> Option<u8> {
    if raw.is_nan() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}
