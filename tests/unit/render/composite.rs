use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_half_alpha_on_opaque_mixes_evenly() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 128]);
    assert_eq!(out[3], 255);
    assert!((127..=129).contains(&out[0]), "{out:?}");
    assert_eq!(out[0], out[1]);
    assert_eq!(out[1], out[2]);
}

#[test]
fn composite_caps_alpha_at_opacity() {
    let mut dst = vec![0, 0, 0, 255];
    composite_in_place(&mut dst, &[255, 255, 255, 255], 0.5).unwrap();
    let expected = over([0, 0, 0, 255], [255, 255, 255, 128]);
    assert_eq!(dst, expected.to_vec());
}

#[test]
fn composite_keeps_alpha_below_cap() {
    let mut a = vec![0, 0, 0, 255];
    let mut b = a.clone();
    composite_in_place(&mut a, &[255, 0, 0, 60], 0.8).unwrap();
    composite_in_place(&mut b, &[255, 0, 0, 60], 1.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn composite_opacity_0_is_noop() {
    let mut dst = vec![1, 2, 3, 4];
    composite_in_place(&mut dst, &[200, 200, 200, 200], 0.0).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 4]);
}

#[test]
fn composite_rejects_mismatched_buffers() {
    let mut dst = vec![0; 8];
    assert!(composite_in_place(&mut dst, &[0; 4], 1.0).is_err());
}

#[test]
fn unpremultiply_restores_straight_channels() {
    let mut buf = vec![64, 0, 32, 128, 9, 9, 9, 0, 10, 20, 30, 255];
    unpremultiply_in_place(&mut buf);
    assert_eq!(&buf[0..4], &[128, 0, 64, 128]);
    assert_eq!(&buf[4..8], &[0, 0, 0, 0]);
    assert_eq!(&buf[8..12], &[10, 20, 30, 255]);
}
