pub mod bootstrap;
pub mod memory;
pub mod provider;
pub mod sqlite;

pub use bootstrap::open;
pub use memory::*;
pub use provider::*;
pub use sqlite::*;
