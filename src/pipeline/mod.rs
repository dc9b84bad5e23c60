// Pipelines that drive the Moderator over many inputs.

pub mod batch;
