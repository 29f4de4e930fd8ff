pub mod config;
pub mod controls;
pub mod history;
pub mod session;
pub mod template;
pub mod tunes;
