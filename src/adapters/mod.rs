// Adapters layer: concrete implementations of the extraction boundary.

pub mod extractor;

pub use extractor::JsonRecordExtractor;
