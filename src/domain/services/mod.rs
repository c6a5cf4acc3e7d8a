mod prompt_builder;

pub use prompt_builder::*;
