pub mod emote;
pub mod image;
pub mod range;
pub mod document;

pub use emote::*;
pub use image::*;
pub use range::*;
pub use document::*;
