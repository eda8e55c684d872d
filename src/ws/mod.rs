//! Front-end WebSocket bridge

pub mod handler;
pub mod protocol;
