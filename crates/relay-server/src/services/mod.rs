//! Background services

pub mod queue_poller;
