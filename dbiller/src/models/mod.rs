mod product;
mod recognition;

pub use product::{NewProduct, Product};
pub use recognition::{
    FuzzyScoreEntry, OcrObservation, RecognitionTrace, RecognizedWord, ScoredProduct,
};
