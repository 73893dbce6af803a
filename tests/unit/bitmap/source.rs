use super::*;

#[test]
fn from_pixels_reads_rows_by_stride_and_converts_format() {
    // 2x2 Bgra8888 with 4 bytes of padding per row
    let pixels = [
        3, 2, 1, 255, 6, 5, 4, 255, 0xAA, 0xAA, 0xAA, 0xAA, //
        9, 8, 7, 255, 12, 11, 10, 255, 0xAA, 0xAA, 0xAA, 0xAA,
    ];
    let bmp = Bitmap::from_pixels(PixelFormat::Bgra8888, &pixels, 2, 2, 12).unwrap();
    assert_eq!(
        bmp.rgba8_premul(),
        &[1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255]
    );
    assert_eq!(bmp.pixel(1, 1), Some([10, 11, 12, 255]));
    assert_eq!(bmp.pixel(2, 0), None);
}

#[test]
fn last_row_padding_may_be_absent() {
    let pixels = [0u8; 12 + 8];
    assert!(Bitmap::from_pixels(PixelFormat::Rgba8888, &pixels, 2, 2, 12).is_ok());
    assert!(Bitmap::from_pixels(PixelFormat::Rgba8888, &pixels[..19], 2, 2, 12).is_err());
}

#[test]
fn invalid_geometry_is_rejected() {
    let pixels = [0u8; 64];
    assert!(Bitmap::from_pixels(PixelFormat::Rgba8888, &pixels, 0, 1, 4).is_err());
    assert!(Bitmap::from_pixels(PixelFormat::Rgba8888, &pixels, 4, 1, 8).is_err());
}

#[test]
fn overflowing_stride_is_a_validation_error() {
    let pixels = [0u8; 64];
    assert!(matches!(
        Bitmap::from_pixels(PixelFormat::Rgba8888, &pixels, 2, 3, usize::MAX / 2 + 1),
        Err(FrameError::Validation(_))
    ));
}

#[test]
fn bitmap_outlives_the_buffer_it_was_copied_from() {
    let mut buf = PixelBuffer::allocate(PixelFormat::Rgb565, 2, 1).unwrap();
    buf.lock().write_pixel(0, 0, 0x001F).unwrap();
    let bmp = Bitmap::from_buffer(&buf);
    buf.release();
    assert_eq!(bmp.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(bmp.pixel(1, 0), Some([0, 0, 0, 255]));
}

#[test]
fn snapshot_from_lock_ignores_later_writes() {
    let mut buf = PixelBuffer::allocate(PixelFormat::Rgba8888, 1, 1).unwrap();
    let mut lock = buf.lock();
    lock.write_rgba8(0, 0, [1, 1, 1, 255]).unwrap();
    let bmp = Bitmap::from_lock(&lock);
    lock.write_rgba8(0, 0, [2, 2, 2, 255]).unwrap();
    assert_eq!(bmp.pixel(0, 0), Some([1, 1, 1, 255]));
}
