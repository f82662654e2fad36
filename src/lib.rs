pub mod adherence;
pub mod cli;
pub mod ctx;
pub mod io;
pub mod math;
pub mod pipeline;
pub mod schema;

pub use adherence::{classify, compute_adherence};
