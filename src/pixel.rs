pub mod buffer;
pub mod format;
pub mod lock;

pub use buffer::PixelBuffer;
pub use format::PixelFormat;
pub use lock::LockedFramebuffer;
