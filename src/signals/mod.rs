// Signal producers — trait-based abstraction for swappable score sources.
//
// The SignalProducer trait defines the interface. KeywordProducer needs no
// network and is the default; the classifier-backed producers wrap external
// APIs. Which ones run is decided by the caller when building a Moderator.

pub mod anthropic;
pub mod keyword;
pub mod openai;
pub mod perspective;
pub mod rate_limiter;
pub mod traits;
