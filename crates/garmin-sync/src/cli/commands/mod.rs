mod sync;

pub use sync::{run, status};
