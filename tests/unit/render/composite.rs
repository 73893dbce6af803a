use super::*;

#[test]
fn transparent_src_keeps_dst() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [0, 0, 0, 0]), dst);
}

#[test]
fn opaque_src_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn transparent_dst_returns_src() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0, 0, 0, 0], src), src);
}

#[test]
fn translucent_src_over_opaque_dst_stays_opaque() {
    let out = over([0, 0, 255, 255], [102, 0, 0, 102]);
    assert_eq!(out, [102, 0, 153, 255]);
}

#[test]
fn over_in_place_rejects_mismatched_layers() {
    let mut dst = vec![0u8; 8];
    assert!(matches!(
        over_in_place(&mut dst, &[0u8; 4]),
        Err(FrameError::Drawing(_))
    ));
    assert!(over_in_place(&mut dst[..6], &[0u8; 6]).is_err());
    over_in_place(&mut dst, &[9, 9, 9, 255, 0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![9, 9, 9, 255, 0, 0, 0, 0]);
}
