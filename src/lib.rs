pub mod config;
pub mod context;
pub mod error;
pub mod loader;
pub mod optimizer;
pub mod output;
pub mod sample;
pub mod table;
pub mod world;
// cmd and reports are binary modules (see main.rs).

pub use self::context::SynthesisContext;
pub use self::error::{PfResult, PopForgeError};
