pub mod batch;
pub mod input;
pub mod scanner;
pub mod agent;

pub use agent::IssueAgent;
pub use batch::map_isolated;
pub use input::{parse_sources, read_sources};
pub use scanner::Scanner;
