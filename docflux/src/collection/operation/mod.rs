mod descriptor;
mod executors;
mod outcomes;

pub use descriptor::*;
pub(crate) use executors::*;
pub use outcomes::*;
