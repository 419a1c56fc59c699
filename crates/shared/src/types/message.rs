mod client;
pub use client::*;

mod worker;
pub use worker::*;

mod message_error;
pub use message_error::*;

/// Name of the discriminator field on every message, in both directions
pub const MESSAGE_TAG: &str = "type";

/// Older page scripts send the discriminator as `kind`; accepted on inbound messages only
pub const MESSAGE_TAG_ALIAS: &str = "kind";
