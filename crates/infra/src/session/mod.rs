//! Host session implementations

mod host_session;
mod sleeper;

pub use host_session::HttpHostSession;
pub use sleeper::TokioSleeper;
