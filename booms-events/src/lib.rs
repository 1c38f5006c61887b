pub mod bus;
pub mod event;
pub mod ws_server;

pub use bus::EventBus;
pub use event::{BoomsEvent, BoomsEventBody, Topic};
