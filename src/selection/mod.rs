pub mod dominance;
pub mod femo;
pub mod selection_strategy;

pub use dominance::{dominates, is_equal};
pub use femo::FemoSelection;
pub use selection_strategy::SelectionStrategy;
