pub mod aggregator;
pub mod etl;
pub mod ranker;
pub mod report;
pub mod resolver;
pub mod selector;
pub mod similarity;

pub use crate::domain::model::{OwnedItem, RankedEntry, RankedReport};
pub use crate::domain::ports::{DurationLookup, LibrarySource, Pipeline, Storage};
pub use crate::utils::error::Result;
