pub mod codec;
pub mod source;
pub mod writable;

pub use codec::ImageEncoding;
pub use source::Bitmap;
pub use writable::WritableBitmap;
