//! Progress reporting while agents run

pub mod reporter;
