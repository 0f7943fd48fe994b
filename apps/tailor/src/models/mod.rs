pub mod resume;

pub use resume::{Project, ResumeDocument};
