// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod logging;
pub mod placement;
pub mod record;
pub mod runtime;
pub mod session;
pub mod store;
pub mod time_series;
pub mod util;

pub use engine::{ClickOutcome, EndScreen, LeaderboardView, RenderCommand, SessionEngine};
pub use error::{PlacementError, SessionError, StoreError};
pub use session::{Phase, SessionConfig};
