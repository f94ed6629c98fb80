use growth_core::{GrowthTier, Interpretation};

/// Map a growth index to its tier label and description.
pub fn interpret_growth_index(growth_index: f64) -> Interpretation {
    GrowthTier::from_score(growth_index).into()
}
