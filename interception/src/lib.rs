//! Collectibles captured by a moving reference body.
//!
//! The reference body (a rolling ball) travels along the x axis in the current [`Direction`].
//! Every free collectible has an intercept threshold; once the reference passes it, the
//! collectible is captured: it snaps onto the ball, moves with it from then on, and its value is
//! combined into an accumulator by a [`CombineRule`].

mod direction;
mod interceptor;
mod layout;
mod rule;

pub use direction::*;
pub use interceptor::*;
pub use layout::*;
pub use rule::*;
