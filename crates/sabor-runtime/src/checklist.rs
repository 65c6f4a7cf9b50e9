//! [`IngredientChecklist`] – "mise en place" ticking for a recipe's
//! ingredients.

use sabor_types::Ingredient;
use tracing::debug;

use crate::progress::ProgressError;

/// Checked state for each ingredient of one recipe.
#[derive(Debug, Clone)]
pub struct IngredientChecklist {
    items: Vec<Ingredient>,
    checked: Vec<bool>,
}

impl IngredientChecklist {
    pub fn new(items: Vec<Ingredient>) -> Self {
        let checked = vec![false; items.len()];
        Self { items, checked }
    }

    pub fn items(&self) -> &[Ingredient] {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn prepared_count(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Every ingredient is ticked.  Never true for an empty list.
    pub fn all_prepared(&self) -> bool {
        !self.items.is_empty() && self.prepared_count() == self.total()
    }

    /// Tick or untick ingredient `index`.
    ///
    /// Returns `true` when this call moved the list into the "all prepared"
    /// state.
    pub fn toggle(&mut self, index: usize, checked: bool) -> Result<bool, ProgressError> {
        if index >= self.total() {
            return Err(ProgressError::OutOfRange {
                index,
                total: self.total(),
            });
        }
        let was_prepared = self.all_prepared();
        self.checked[index] = checked;
        let now_prepared = self.all_prepared();
        debug!(index, checked, prepared = self.prepared_count(), "ingredient toggled");
        Ok(now_prepared && !was_prepared)
    }

    pub fn reset(&mut self) {
        self.checked.iter_mut().for_each(|c| *c = false);
    }
}
