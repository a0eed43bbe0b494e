//! WebSocket fan-out: client registry plus the upgrade handler.

pub mod handler;
pub mod registry;

pub use handler::ws_handler;
pub use registry::ClientRegistry;
