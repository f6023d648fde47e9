pub mod frame_slot;
pub mod frame_source;

pub use frame_slot::{frame_slot, FrameReceiver, FrameSender};
pub use frame_source::{FrameSource, SourceRunner, StillImageSource, SyntheticSource};
