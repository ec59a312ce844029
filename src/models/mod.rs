pub mod enhancement;
pub mod mood;
pub mod pattern;
pub mod sentiment;
pub mod settings;
pub mod storage;
pub mod suggestion;

pub use enhancement::*;
pub use mood::*;
pub use pattern::*;
pub use sentiment::*;
pub use settings::*;
pub use storage::*;
pub use suggestion::*;
