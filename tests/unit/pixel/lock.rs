use super::*;

fn pattern(x: u32, y: u32) -> u32 {
    (x + (y << 8)) | 0xFF00_0000
}

#[test]
fn every_pixel_round_trips_through_the_lock() {
    for format in PixelFormat::ALL {
        let mut buf = PixelBuffer::allocate(format, 17, 9).unwrap();
        let mask = if format.bytes_per_pixel() == 4 { u32::MAX } else { 0xFFFF };
        let mut lock = buf.lock();
        for y in 0..9 {
            for x in 0..17 {
                lock.write_pixel(x, y, pattern(x, y)).unwrap();
            }
        }
        for y in 0..9 {
            for x in 0..17 {
                assert_eq!(lock.read_pixel(x, y).unwrap(), pattern(x, y) & mask);
            }
        }
    }
}

#[test]
fn logical_pixels_do_not_depend_on_stride() {
    for format in PixelFormat::ALL {
        let packed = 13 * format.bytes_per_pixel();
        let mut tight = PixelBuffer::allocate(format, 13, 7).unwrap();
        let mut padded = PixelBuffer::allocate_with_stride(format, 13, 7, packed + 11).unwrap();

        for buf in [&mut tight, &mut padded] {
            let mut lock = buf.lock();
            let row: Vec<u32> = (0..13).map(|x| pattern(x, 3)).collect();
            for y in 0..7 {
                lock.write_row(y, &row).unwrap();
            }
        }

        let a = tight.lock();
        let b = padded.lock();
        for y in 0..7 {
            assert_eq!(a.row(y).unwrap(), b.row(y).unwrap());
            for x in 0..13 {
                assert_eq!(a.read_pixel(x, y).unwrap(), b.read_pixel(x, y).unwrap());
            }
        }
        drop(a);
        drop(b);
        assert_eq!(tight.to_rgba8_premul(), padded.to_rgba8_premul());
    }
}

#[test]
fn pixel_offset_uses_row_stride() {
    let mut buf = PixelBuffer::allocate_with_stride(PixelFormat::Rgb565, 10, 4, 32).unwrap();
    let lock = buf.lock();
    assert_eq!(lock.pixel_offset(0, 0).unwrap(), 0);
    assert_eq!(lock.pixel_offset(3, 0).unwrap(), 6);
    assert_eq!(lock.pixel_offset(3, 2).unwrap(), 70);
}

#[test]
fn out_of_bounds_access_is_rejected() {
    let mut buf = PixelBuffer::allocate(PixelFormat::Rgba8888, 4, 4).unwrap();
    let mut lock = buf.lock();
    assert!(lock.read_pixel(4, 0).is_err());
    assert!(lock.write_pixel(0, 4, 1).is_err());
    assert!(lock.row(4).is_err());
    assert!(lock.write_row(0, &[0; 5]).is_err());
}

#[test]
fn write_row_leaves_padding_alone() {
    let mut buf = PixelBuffer::allocate_with_stride(PixelFormat::Rgba8888, 2, 2, 10).unwrap();
    let mut lock = buf.lock();
    lock.data_mut().fill(0xEE);
    lock.write_row(1, &[0x0403_0201, 0x0807_0605]).unwrap();
    assert_eq!(&lock.data()[10..18], &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(&lock.data()[18..20], &[0xEE, 0xEE]);
}

#[test]
fn fill_is_clipped_and_format_encoded() {
    let mut buf = PixelBuffer::allocate(PixelFormat::Bgra8888, 4, 2).unwrap();
    let mut lock = buf.lock();
    lock.fill_rgba8(2, 0, 100, 100, [255, 0, 0, 255]);
    assert_eq!(lock.read_rgba8(1, 0).unwrap(), [0, 0, 0, 0]);
    assert_eq!(lock.read_rgba8(2, 1).unwrap(), [255, 0, 0, 255]);
    assert_eq!(lock.read_pixel(3, 1).unwrap(), 0xFFFF_0000);
    // empty rectangles are a no-op
    lock.fill_rgba8(3, 0, 3, 2, [1, 1, 1, 1]);
    assert_eq!(lock.read_rgba8(3, 0).unwrap(), [255, 0, 0, 255]);
}

#[test]
fn bulk_copy_checks_length_and_honors_stride() {
    let mut buf = PixelBuffer::allocate_with_stride(PixelFormat::Rgba8888, 2, 1, 12).unwrap();
    let mut lock = buf.lock();
    assert!(lock.copy_from_rgba8_premul(&[0; 4]).is_err());
    lock.copy_from_rgba8_premul(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(lock.to_rgba8_premul(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(&lock.data()[8..], &[0, 0, 0, 0]);
}

#[test]
fn lock_reports_standard_dpi_by_default() {
    let mut buf = PixelBuffer::allocate(PixelFormat::Rgba8888, 1, 1).unwrap();
    let lock = buf.lock();
    assert_eq!(lock.dpi(), Dpi::STANDARD);
    let lock = lock.with_dpi(Dpi::new(192.0, 192.0).unwrap());
    assert_eq!(lock.dpi().scale(), (2.0, 2.0));
    lock.unlock();
}
