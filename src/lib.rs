// gapfinder: research gap analysis from paper abstracts
//
// This is the library root. Each module corresponds to a stage of the
// analysis: collecting abstracts, extracting topics, suggesting gaps,
// and rendering the results.

pub mod config;
pub mod output;
pub mod papers;
pub mod pipeline;
pub mod suggest;
pub mod topics;
