// Library root: re-exports the engine's public API so integration tests
// and embedding applications can reach it without deep module paths.

pub mod config;
pub mod market;
pub mod quotations;

pub use config::{ConfigError, EngineConfig};
pub use market::adapter::RawPlayerRecord;
pub use market::engine::{AutomaticReport, MarketError, MarketSnapshot, TransferEngine};
pub use market::player::{name_key, Player, Role};
pub use market::session::{GuidedSession, SessionState};
pub use market::solution::{Solution, Swap};
