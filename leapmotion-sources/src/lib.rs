//! Leap Motion Tracking Sources
//! ============================
//!
//! Client for the Leap Motion service's WebSocket JSON protocol (v6):
//! - Connection handshake (gesture recognition, background delivery)
//! - Continuous decode of tracking frames and device events on a background task
//! - Close/done lifecycle with a one-shot completion signal
//! - Interaction-box normalization of sensor coordinates into the unit cube

pub mod client;
pub mod config;
pub mod done;
pub mod error;
pub mod frame;
pub mod interaction_box;
pub mod protocol;
pub mod stats;
pub mod traits;

pub use client::{StreamClient, StreamClientBuilder};
pub use config::{ClientConfig, DEFAULT_URL};
pub use done::DoneSignal;
pub use error::{Result, SourceError};
pub use frame::{DeviceEvent, Frame, Gesture, Hand, InteractionBox, Pointable, ServiceVersion};
pub use interaction_box::normalize_point;
pub use stats::StatsSnapshot;
pub use traits::{DeviceEventHandler, FrameHandler, SkipObserver};
