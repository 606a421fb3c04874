//! Analysis engine: lexicon tables, contextual scanners, the
//! rating/comment classifier, and batch detection.

pub mod classifier;
pub mod context;
pub mod detector;
pub mod lexicon;

pub use classifier::{Classification, Classifier};
pub use detector::InconsistencyDetector;
pub use lexicon::LexiconTables;
