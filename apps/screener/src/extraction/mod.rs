// Turning uploaded PDFs into candidate fields: PDF text, token-classifier
// entities (BIO reconstruction) and regex fallbacks.

pub mod entities;
pub mod heuristics;
pub mod ner;
pub mod text;
