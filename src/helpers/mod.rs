//! Helper functions shared by the generator, templates and preview server

mod url;

pub use url::*;
