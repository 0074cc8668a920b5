//! Session layer: the store's sole mutator and the view's data source

pub mod controller;
pub mod ops;

pub use controller::{AddOutcome, GraphSession, MergeOutcome, Selection, SessionStats};
pub use ops::GraphOp;
