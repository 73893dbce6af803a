use super::*;

#[test]
fn framebuffer_is_both_lockable_and_a_framebuffer_descriptor() {
    let mut fb = Framebuffer::new(PixelFormat::Rgb565, 80, 80).unwrap();
    assert_eq!(fb.row_stride(), 160);
    assert!(fb.as_framebuffer().is_some());
    assert!(fb.describe().contains("80x80 Rgb565"));

    {
        let mut lock = Lockable::lock(&mut fb).unwrap();
        lock.write_pixel(1, 1, 0xF800).unwrap();
        assert_eq!(lock.dpi(), Dpi::STANDARD);
    }

    let surface = fb.as_framebuffer().unwrap();
    assert_eq!(surface.size(), (80, 80));
    let lock = surface.lock_framebuffer().unwrap();
    assert_eq!(lock.read_pixel(1, 1).unwrap(), 0xF800);
}

#[test]
fn overlapping_shared_locks_are_a_lock_state_error() {
    let fb = Framebuffer::new(PixelFormat::Rgba8888, 4, 4).unwrap();
    let first = fb.lock_framebuffer().unwrap();
    let err = fb.lock_framebuffer().err().unwrap();
    assert!(matches!(err, FrameError::LockState(_)));
    assert!(fb.with_pixels(|_| ()).is_err());

    first.unlock();
    assert!(fb.lock_framebuffer().is_ok());
    assert!(fb.with_pixels(|b| b.width()).is_ok());
}

#[test]
fn metadata_is_readable_while_locked() {
    let fb = Framebuffer::new(PixelFormat::Bgra8888, 3, 2).unwrap();
    let _lock = fb.lock_framebuffer().unwrap();
    assert_eq!(fb.format(), PixelFormat::Bgra8888);
    assert_eq!(fb.size(), (3, 2));
    assert!(fb.describe().starts_with("framebuffer"));
}

#[test]
fn padded_buffer_keeps_its_stride() {
    let buf = PixelBuffer::allocate_with_stride(PixelFormat::Rgba8888, 5, 5, 64).unwrap();
    let fb = Framebuffer::from_buffer(buf).with_dpi(Dpi::new(120.0, 120.0).unwrap());
    assert_eq!(fb.row_stride(), 64);
    assert_eq!(fb.lock_framebuffer().unwrap().row_stride(), 64);
    assert_eq!(fb.dpi().x, 120.0);
    assert_eq!(fb.into_buffer().row_stride(), 64);
}

#[test]
fn native_windows_offer_no_framebuffer() {
    let window = NativeWindowSurface {
        handle: 0x2a,
        kind: "x11",
    };
    assert!(window.as_framebuffer().is_none());
    assert_eq!(window.describe(), "x11 window 0x2a");
}

#[test]
fn deallocate_consumes_the_framebuffer() {
    let fb = Framebuffer::new(PixelFormat::Rgba8888, 2, 2).unwrap();
    fb.deallocate();
}
