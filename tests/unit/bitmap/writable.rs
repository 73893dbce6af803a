use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "framecheck_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn repeated_lock_sessions_accumulate_writes() {
    let mut wb = WritableBitmap::new(4, 4, PixelFormat::Rgba8888).unwrap();
    {
        let mut lock = wb.lock().unwrap();
        lock.write_pixel(0, 0, 0xFF00_00FF).unwrap();
    }
    {
        let mut lock = wb.lock().unwrap();
        assert_eq!(lock.read_pixel(0, 0).unwrap(), 0xFF00_00FF);
        lock.write_pixel(3, 3, 0xFFFF_0000).unwrap();
    }
    let bmp = wb.to_bitmap();
    assert_eq!(bmp.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(bmp.pixel(3, 3), Some([0, 0, 255, 255]));
}

#[test]
fn lock_carries_configured_dpi() {
    let mut wb = WritableBitmap::new(1, 1, PixelFormat::Bgra8888)
        .unwrap()
        .with_dpi(Dpi::new(144.0, 144.0).unwrap());
    assert_eq!(wb.lock().unwrap().dpi().scale(), (1.5, 1.5));
}

#[test]
fn save_reads_current_contents_not_a_snapshot() {
    let tmp = temp_dir("writable_save_current");
    let mut wb = WritableBitmap::new(2, 1, PixelFormat::Bgra8888).unwrap();
    let path = tmp.join("wb.out.png");

    wb.lock().unwrap().fill_rgba8(0, 0, 2, 1, [0, 0, 255, 255]);
    wb.save(&path).unwrap();
    wb.lock().unwrap().fill_rgba8(0, 0, 2, 1, [0, 255, 0, 255]);
    wb.save(&path).unwrap();

    let back = codec::decode(&path, PixelFormat::Bgra8888).unwrap();
    assert_eq!(back.to_rgba8_premul(), vec![0, 255, 0, 255, 0, 255, 0, 255]);
    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn padded_writable_bitmap_saves_logical_pixels_only() {
    let tmp = temp_dir("writable_padded");
    let buf = PixelBuffer::allocate_with_stride(PixelFormat::Rgba8888, 3, 3, 20).unwrap();
    let mut wb = WritableBitmap::from_buffer(buf);
    {
        let mut lock = wb.lock().unwrap();
        lock.data_mut().fill(0x7F);
        for y in 0..3 {
            lock.write_row(y, &[0xFF11_2233; 3]).unwrap();
        }
    }
    let path = tmp.join("padded.png");
    wb.save(&path).unwrap();
    let img = codec::decode_rgba8(&path).unwrap();
    assert_eq!(img.dimensions(), (3, 3));
    assert!(img.pixels().all(|p| p.0 == [0x33, 0x22, 0x11, 0xFF]));
    wb.release();
    std::fs::remove_dir_all(&tmp).ok();
}
