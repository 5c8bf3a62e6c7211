pub mod engine;
pub mod feed;
pub mod progression;
pub mod selection;

pub use engine::{suggest, Confidence, Suggestion};
