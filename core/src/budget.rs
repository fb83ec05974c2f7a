// Operation-count estimation and budget trimming for recipe sets.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::model::{CountSpec, OpKind, OpRecipe};

pub const DEFAULT_BUDGET_MARGIN: f64 = 0.2;

// Expected op count: Σ midpoint(count) · opsPerCenter, rounded up.
pub fn estimate_ops_for_recipes(recipes: &[OpRecipe]) -> u32 {
    let total: f64 = recipes
        .iter()
        .map(|r| r.count.midpoint() * r.ops_per_center() as f64)
        .sum();
    total.ceil() as u32
}

// Budget with headroom: ceil(estimate · (1 + margin)).
pub fn suggest_global_budget(recipes: &[OpRecipe], margin: f64) -> u32 {
    let estimate = estimate_ops_for_recipes(recipes) as f64;
    (estimate * (1.0 + margin.max(0.0))).ceil() as u32
}

// One decrement applied by `auto_budget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetChange {
    pub index: usize,
    pub kind: OpKind,
    pub from: u32,
    pub to: u32,
    pub saved_ops: u32,
    // Recipe removed outright because its protected minimum alone overflowed the budget
    #[serde(default)]
    pub dropped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetResult {
    // Surviving recipes in input order; trimmed counts become fixed.
    pub recipes: Vec<OpRecipe>,
    // Final per-recipe counts aligned with the input slice (0 for dropped).
    pub counts: Vec<u32>,
    pub used_ops: u32,
    pub changes: Vec<BudgetChange>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TrimSlot {
    pub kind: OpKind,
    pub count: u32,
    pub per_center: u32,
}

// Next slot to lose a centre: lowest trim priority first, then the most
// expensive centre, then the latest recipe.
pub(crate) fn pick_trim(slots: &[TrimSlot], respect_floor: bool) -> Option<usize> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, s)| {
            let floor = if respect_floor { s.kind.min_count() } else { 0 };
            s.per_center > 0 && s.count > floor
        })
        .max_by_key(|(i, s)| (Reverse(s.kind.trim_priority()), s.per_center, *i))
        .map(|(i, _)| i)
}

// Reduce recipe counts until the estimated op count fits `max_ops`.
//
// Counts are taken as the rounded midpoint of each recipe's range. Valleys
// keep at least one centre during normal trimming; if the protected
// minimums alone still exceed the budget those recipes are dropped, so
// `used_ops <= max_ops` always holds on return.
pub fn auto_budget(recipes: &[OpRecipe], max_ops: u32) -> BudgetResult {
    let mut slots: Vec<TrimSlot> = recipes
        .iter()
        .map(|r| TrimSlot {
            kind: r.kind,
            count: r.count.estimate(),
            per_center: r.ops_per_center(),
        })
        .collect();
    let original: Vec<u32> = slots.iter().map(|s| s.count).collect();
    let mut used: u32 = slots.iter().map(|s| s.count * s.per_center).sum();
    let mut changes = Vec::new();

    for respect_floor in [true, false] {
        while used > max_ops {
            let Some(i) = pick_trim(&slots, respect_floor) else {
                break;
            };
            let slot = &mut slots[i];
            let from = slot.count;
            slot.count -= 1;
            used -= slot.per_center;
            changes.push(BudgetChange {
                index: i,
                kind: slot.kind,
                from,
                to: slot.count,
                saved_ops: slot.per_center,
                dropped: !respect_floor,
            });
        }
    }

    if !changes.is_empty() {
        log::debug!(
            "auto_budget: {} decrements, {} ops used of {}",
            changes.len(),
            used,
            max_ops
        );
    }

    let counts: Vec<u32> = slots.iter().map(|s| s.count).collect();
    let trimmed = recipes
        .iter()
        .zip(slots.iter().zip(&original))
        .filter_map(|(recipe, (slot, &before))| {
            if slot.count == before {
                return Some(recipe.clone());
            }
            // Trimmed to nothing: leave it out of the set
            if slot.count == 0 {
                return None;
            }
            let mut r = recipe.clone();
            r.count = CountSpec::Fixed(slot.count);
            Some(r)
        })
        .collect();

    BudgetResult {
        recipes: trimmed,
        counts,
        used_ops: used,
        changes,
    }
}
