use super::domain::{CostRange, ItemType, ProblemType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Cost, time and risk figures for one (item, problem) combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub repair_cost_min: f64,
    pub repair_cost_max: f64,
    pub repair_days: f64,
    pub used_price_min: f64,
    pub used_price_max: f64,
    pub new_price: f64,
    /// Likelihood (0-1) that a repair attempt fails.
    pub risk: f64,
}

impl ReferenceEntry {
    pub fn repair_cost(&self) -> CostRange {
        CostRange::new(self.repair_cost_min, self.repair_cost_max)
    }

    pub fn used_price(&self) -> CostRange {
        CostRange::new(self.used_price_min, self.used_price_max)
    }
}

/// How specific the row backing an evaluation was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLevel {
    Exact,
    CategoryFallback,
    GlobalFallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceMatch {
    pub entry: ReferenceEntry,
    pub level: MatchLevel,
}

/// Immutable lookup keyed by (item, problem) with a two-level fallback.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceTable {
    entries: BTreeMap<(ItemType, ProblemType), ReferenceEntry>,
}

impl ReferenceTable {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = ((ItemType, ProblemType), ReferenceEntry)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Built-in table, constructed on first use and shared read-only.
    pub fn standard() -> &'static ReferenceTable {
        static TABLE: OnceLock<ReferenceTable> = OnceLock::new();
        TABLE.get_or_init(|| Self::from_entries(standard_rows()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = (ItemType, ProblemType)> + '_ {
        self.entries.keys().copied()
    }

    pub fn get(&self, item: ItemType, problem: ProblemType) -> Option<&ReferenceEntry> {
        self.entries.get(&(item, problem))
    }

    /// Resolves exact row, then the category's `other` row, then `other/other`.
    pub fn lookup(&self, item: ItemType, problem: ProblemType) -> Option<ReferenceMatch> {
        if let Some(entry) = self.get(item, problem) {
            return Some(ReferenceMatch {
                entry: *entry,
                level: MatchLevel::Exact,
            });
        }

        if let Some(entry) = self.get(item, ProblemType::Other) {
            return Some(ReferenceMatch {
                entry: *entry,
                level: MatchLevel::CategoryFallback,
            });
        }

        self.get(ItemType::Other, ProblemType::Other)
            .map(|entry| ReferenceMatch {
                entry: *entry,
                level: MatchLevel::GlobalFallback,
            })
    }
}

const fn row(
    repair: (f64, f64),
    repair_days: f64,
    used: (f64, f64),
    new_price: f64,
    risk: f64,
) -> ReferenceEntry {
    ReferenceEntry {
        repair_cost_min: repair.0,
        repair_cost_max: repair.1,
        repair_days,
        used_price_min: used.0,
        used_price_max: used.1,
        new_price,
        risk,
    }
}

const PHONE_USED: (f64, f64) = (2000.0, 5000.0);
const PHONE_NEW: f64 = 8000.0;
const LAPTOP_USED: (f64, f64) = (4000.0, 9000.0);
const LAPTOP_NEW: f64 = 14000.0;
const CLOTHING_USED: (f64, f64) = (200.0, 800.0);
const CLOTHING_NEW: f64 = 1200.0;

fn standard_rows() -> Vec<((ItemType, ProblemType), ReferenceEntry)> {
    use ItemType::{Clothing, Laptop, Phone};
    use ProblemType::*;

    vec![
        ((Phone, Screen), row((800.0, 2000.0), 1.0, PHONE_USED, PHONE_NEW, 0.1)),
        ((Phone, Battery), row((500.0, 1200.0), 1.0, PHONE_USED, PHONE_NEW, 0.05)),
        ((Phone, Slow), row((300.0, 900.0), 1.0, PHONE_USED, PHONE_NEW, 0.2)),
        ((Phone, NoPower), row((700.0, 2500.0), 3.0, PHONE_USED, PHONE_NEW, 0.3)),
        ((Phone, Water), row((1000.0, 3000.0), 5.0, PHONE_USED, PHONE_NEW, 0.35)),
        ((Phone, Other), row((700.0, 2500.0), 3.0, PHONE_USED, PHONE_NEW, 0.25)),
        ((Laptop, Screen), row((1500.0, 4000.0), 5.0, LAPTOP_USED, LAPTOP_NEW, 0.15)),
        ((Laptop, Battery), row((800.0, 2000.0), 3.0, LAPTOP_USED, LAPTOP_NEW, 0.1)),
        ((Laptop, Slow), row((500.0, 1500.0), 2.0, LAPTOP_USED, LAPTOP_NEW, 0.1)),
        ((Laptop, NoPower), row((1200.0, 4500.0), 7.0, LAPTOP_USED, LAPTOP_NEW, 0.35)),
        ((Laptop, Water), row((2000.0, 6000.0), 10.0, LAPTOP_USED, LAPTOP_NEW, 0.45)),
        ((Laptop, Other), row((1000.0, 4000.0), 5.0, LAPTOP_USED, LAPTOP_NEW, 0.25)),
        ((Clothing, Zipper), row((150.0, 400.0), 3.0, CLOTHING_USED, CLOTHING_NEW, 0.05)),
        ((Clothing, Seam), row((100.0, 300.0), 2.0, CLOTHING_USED, CLOTHING_NEW, 0.05)),
        ((Clothing, Other), row((150.0, 500.0), 4.0, CLOTHING_USED, CLOTHING_NEW, 0.1)),
        (
            (ItemType::Other, Other),
            row((300.0, 1500.0), 7.0, (500.0, 2000.0), 3000.0, 0.3),
        ),
    ]
}
