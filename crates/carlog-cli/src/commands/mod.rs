//! Command handlers, one module per command group.

pub mod alerts;
pub mod dashboard;
pub mod init;
pub mod misc;
pub mod services;
pub mod transfer;
pub mod vehicles;
