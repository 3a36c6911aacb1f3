//! Process lifecycle coordination

mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownListener, ShutdownNotifier, ShutdownRequest};
