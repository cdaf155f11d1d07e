pub mod error;
pub mod info;
pub mod reader;
pub mod testing;

pub use error::PlaybackError;
pub use info::VideoInfo;
pub use reader::{ReadOutcome, SeekCost, VideoReader};
