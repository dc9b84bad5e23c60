// ModerationKit: platform-aware content moderation decisions.
//
// This is the library root. Signal producers turn text into raw category
// scores; the moderation core adjusts them for the platform and decides
// allow, review or block.

pub mod config;
pub mod moderation;
pub mod output;
pub mod pipeline;
pub mod signals;

#[cfg(feature = "web")]
pub mod web;
