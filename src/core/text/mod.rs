// Text analysis primitives shared by the lexicon and the classifier.

pub mod phonetic;
pub mod tokenizer;

pub use phonetic::{phonetic_code, PhoneticIndex};
pub use tokenizer::Tokenizer;
