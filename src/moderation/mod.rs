// Moderation core — platform rules, aggregation and the decision engine.
//
// Everything here is shared by all signal producers. `engine` is the entry
// point; `platform` and `decision` are pure functions it composes.

pub mod decision;
pub mod engine;
pub mod error;
pub mod models;
pub mod platform;

pub use engine::{DecisionEngine, Moderator};
pub use models::{
    Category, CategoryScores, ModerationRequest, ModerationResult, ModeratorConfig, Platform,
    Strictness, SuggestedAction,
};
