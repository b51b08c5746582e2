use super::domain::{CostRange, ItemType, Recommendation};

/// Embodied-carbon figures (kg CO2e) for an item category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonProfile {
    pub embodied: CostRange,
    /// Share of lifetime emissions attributable to production, when known.
    pub production_share: Option<f64>,
    pub refurbishment_penalty_kg: f64,
}

impl CarbonProfile {
    pub const fn for_item(item: ItemType) -> Self {
        match item {
            ItemType::Phone => Self {
                embodied: CostRange::new(60.0, 85.0),
                production_share: Some(0.74),
                refurbishment_penalty_kg: 0.0,
            },
            ItemType::Laptop => Self {
                embodied: CostRange::new(250.0, 370.0),
                production_share: Some(0.80),
                refurbishment_penalty_kg: 11.1,
            },
            ItemType::Clothing => Self {
                embodied: CostRange::new(10.0, 30.0),
                production_share: None,
                refurbishment_penalty_kg: 0.0,
            },
            ItemType::Other => Self {
                embodied: CostRange::new(20.0, 80.0),
                production_share: None,
                refurbishment_penalty_kg: 0.0,
            },
        }
    }

    /// Most CO2e any option can save for this category.
    pub fn max_possible_kg(&self) -> f64 {
        match self.production_share {
            Some(share) => self.embodied.max * share,
            None => self.embodied.max,
        }
    }

    pub fn co2e_saved(&self, kind: Recommendation) -> CostRange {
        let saved = match self.production_share {
            Some(share) => {
                let production = self.embodied.scale(share);
                match kind {
                    Recommendation::Repair => production,
                    Recommendation::BuyUsed | Recommendation::Donate => CostRange::new(
                        production.min - self.refurbishment_penalty_kg,
                        production.max - self.refurbishment_penalty_kg,
                    ),
                    Recommendation::Recycle => production.scale_each(0.15, 0.30),
                }
            }
            None => {
                let (low, high) = match kind {
                    Recommendation::Repair => (0.70, 0.90),
                    Recommendation::BuyUsed => (0.50, 0.70),
                    Recommendation::Donate => (0.40, 0.60),
                    Recommendation::Recycle => (0.15, 0.30),
                };
                self.embodied.scale_each(low, high)
            }
        };
        saved.floor_at_zero()
    }

    /// Median saving mapped onto 5-95; repair additionally loses `risk_penalty`.
    pub fn impact_score(&self, saved: &CostRange, risk_penalty: f64) -> f64 {
        let max_possible = self.max_possible_kg();
        let ratio = if max_possible > 0.0 {
            (saved.median() / max_possible).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let score = (5.0 + ratio * 90.0 - risk_penalty).clamp(5.0, 95.0);
        (score * 10.0).round() / 10.0
    }
}
