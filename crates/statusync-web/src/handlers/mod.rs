//! API 핸들러.

pub mod activity;
pub mod emojis;
