//! Reference plugins shipped with the pipeline.

mod fs_load;
mod replace;
mod scoped;

pub use fs_load::FsLoadPlugin;
pub use replace::ReplacePlugin;
pub use scoped::ScopedPlugin;
