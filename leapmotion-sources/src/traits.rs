//! Callback traits invoked from the receive loop
//!
//! All callbacks run on the client's receive task, one at a time and in
//! arrival order. A callback that blocks stalls delivery for that client.

use crate::error::SourceError;
use crate::frame::{DeviceEvent, Frame};

/// Receives every successfully decoded tracking frame.
pub trait FrameHandler: Send + 'static {
    fn on_frame(&mut self, frame: Frame);
}

impl<F> FrameHandler for F
where
    F: FnMut(Frame) + Send + 'static,
{
    fn on_frame(&mut self, frame: Frame) {
        self(frame)
    }
}

/// Receives device attach/detach and streaming state changes.
pub trait DeviceEventHandler: Send + 'static {
    fn on_device_event(&mut self, event: DeviceEvent);
}

impl<F> DeviceEventHandler for F
where
    F: FnMut(DeviceEvent) + Send + 'static,
{
    fn on_device_event(&mut self, event: DeviceEvent) {
        self(event)
    }
}

/// Told about every inbound message the loop had to skip.
pub trait SkipObserver: Send + 'static {
    fn on_skip(&mut self, error: &SourceError);
}

impl<F> SkipObserver for F
where
    F: FnMut(&SourceError) + Send + 'static,
{
    fn on_skip(&mut self, error: &SourceError) {
        self(error)
    }
}
