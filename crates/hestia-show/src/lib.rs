//! Light shows and the television that runs them.
//!
//! A show is a video plus a time-coded action script over the output
//! devices. The [`Television`] owns the pipeline: it seizes the script's
//! device pool, asks the hub to start the video, detects the trigger tone
//! that marks the video's real start and then replays the script in
//! lockstep with the tick clock.

pub mod action;
pub mod error;
pub mod television;
pub mod tone;

pub use action::{Action, DeviceCommand, PowerAction, Show, parse_command};
pub use error::{Result, ShowError};
pub use television::{Playback, Television};
pub use tone::ToneDetector;
