//! vigil-hw — Hardware abstraction for camera capture and frame output.
//!
//! Provides V4L2-based camera access, pixel-format conversion to
//! grayscale, and in-place frame annotation for the overlay sink.

pub mod camera;
pub mod frame;
pub mod overlay;

pub use camera::{Camera, CameraError, DeviceInfo, FrameStream};
pub use frame::{Frame, FrameError, PixelFormat};
