//! Core types shared across the Hestia control-box crates.
//!
//! This crate holds the vocabulary of the whole workspace: device
//! identifiers, RGB colors, NFC card UIDs, easing curves, the injectable
//! millisecond clock every stateful component is driven by, and the
//! workspace-wide error type. Nothing here touches hardware; the boundary
//! traits live in `hestia-hardware`.

pub mod clock;
pub mod constants;
pub mod error;
pub mod rng;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use rng::TickRng;
pub use types::{CardUid, DeviceId, Easing, Percent, Rgb, StripModeKind};
