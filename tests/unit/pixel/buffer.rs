use super::*;

#[test]
fn allocate_packs_rows_tightly() {
    for (format, bpp) in [
        (PixelFormat::Rgba8888, 4),
        (PixelFormat::Bgra8888, 4),
        (PixelFormat::Rgb565, 2),
    ] {
        let buf = PixelBuffer::allocate(format, 80, 60).unwrap();
        assert_eq!(buf.row_stride(), 80 * bpp);
        assert_eq!(buf.byte_len(), 60 * 80 * bpp);
        assert_eq!(buf.packed_row_len(), 80 * bpp);
        assert!(buf.bytes().iter().all(|&b| b == 0));
    }
}

#[test]
fn allocate_rejects_zero_dimensions() {
    let err = PixelBuffer::allocate(PixelFormat::Rgba8888, 0, 10).unwrap_err();
    assert!(matches!(err, FrameError::Validation(_)));
    let err = PixelBuffer::allocate(PixelFormat::Rgba8888, 10, 0).unwrap_err();
    assert!(matches!(err, FrameError::Validation(_)));
}

#[test]
fn stride_below_packed_row_is_rejected() {
    let err = PixelBuffer::allocate_with_stride(PixelFormat::Rgba8888, 10, 10, 39).unwrap_err();
    assert!(matches!(err, FrameError::Validation(_)));
    assert!(PixelBuffer::allocate_with_stride(PixelFormat::Rgba8888, 10, 10, 40).is_ok());
}

#[test]
fn size_overflow_is_an_allocation_error() {
    let err =
        PixelBuffer::allocate_with_stride(PixelFormat::Rgba8888, 4, u32::MAX, usize::MAX / 2)
            .unwrap_err();
    assert!(matches!(err, FrameError::Allocation { .. }));
}

#[test]
fn padded_stride_allocates_height_times_stride() {
    let buf = PixelBuffer::allocate_with_stride(PixelFormat::Rgb565, 3, 5, 16).unwrap();
    assert_eq!(buf.byte_len(), 80);
    assert_eq!(buf.packed_row_len(), 6);
    assert_eq!(buf.rows().count(), 5);
    assert!(buf.rows().all(|r| r.len() == 6));
}

#[test]
fn readback_skips_padding() {
    let mut buf = PixelBuffer::allocate_with_stride(PixelFormat::Rgba8888, 2, 2, 12).unwrap();
    {
        let mut lock = buf.lock();
        lock.data_mut().fill(0xAB);
        lock.write_rgba8(0, 0, [1, 2, 3, 255]).unwrap();
        lock.write_rgba8(1, 0, [4, 5, 6, 255]).unwrap();
        lock.write_rgba8(0, 1, [7, 8, 9, 255]).unwrap();
        lock.write_rgba8(1, 1, [10, 11, 12, 255]).unwrap();
    }
    assert_eq!(
        buf.to_rgba8_premul(),
        vec![1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, 10, 11, 12, 255]
    );
    // padding was scribbled but never surfaces as a pixel
    assert_eq!(&buf.bytes()[8..12], &[0xAB; 4]);
}

#[test]
fn straight_readback_unpremultiplies() {
    let mut buf = PixelBuffer::allocate(PixelFormat::Bgra8888, 1, 1).unwrap();
    buf.lock().write_rgba8(0, 0, [64, 32, 0, 128]).unwrap();
    assert_eq!(buf.to_rgba8_straight(), vec![128, 64, 0, 128]);
}

#[test]
fn release_consumes_the_buffer() {
    let buf = PixelBuffer::allocate(PixelFormat::Rgba8888, 4, 4).unwrap();
    buf.release();
}
