// Abstract collection: the Semantic Scholar search client and CSV uploads.
//
// Both sources produce the same thing: a list of plain-text abstracts
// that the rest of the pipeline treats as documents.

pub mod client;
pub mod upload;
