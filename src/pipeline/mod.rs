// Analysis pipeline: documents -> keywords + clusters -> gap suggestions.

pub mod analyze;
