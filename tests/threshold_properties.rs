use planescan::threshold::{histogram, mean_shift_cutoff, otsu_cutoff};
use planescan::{
    adaptive_threshold, apply_binary, apply_threshold, binarize, compute_cutoff, AdaptiveConfig,
    ImageView, Plane, PlaneScanError, ThresholdMethod, ThresholdType,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn two_level_image(rng: &mut StdRng, a: u8, b: u8, width: usize, height: usize) -> Plane<u8> {
    let half = width * height / 2;
    let mut data: Vec<u8> = (0..width * height)
        .map(|i| if i < half { a } else { b })
        .collect();
    data.shuffle(rng);
    Plane::new(data, width, height).unwrap()
}

#[test]
fn apply_binary_is_idempotent_on_binary_planes() {
    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<u8> = (0..40 * 30)
        .map(|_| if rng.random_bool(0.4) { 255 } else { 0 })
        .collect();
    let original = Plane::new(data, 40, 30).unwrap();

    let mut once = original.clone();
    apply_binary(&mut once, 127, false);
    assert_eq!(once, original);
    let mut twice = once.clone();
    apply_binary(&mut twice, 127, false);
    assert_eq!(twice, once);
}

#[test]
fn otsu_splits_equal_bimodal_populations() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..25 {
        let a: u8 = rng.random_range(0..200);
        let b: u8 = rng.random_range(a + 3..=255);
        let img = two_level_image(&mut rng, a, b, 16, 16);
        let cutoff = compute_cutoff(img.view(), ThresholdMethod::Otsu);
        assert!(a < cutoff && cutoff < b, "a={a} b={b} cutoff={cutoff}");
        assert_eq!(cutoff, otsu_cutoff(&histogram(img.view())));
    }
}

#[test]
fn binarize_separates_two_levels() {
    let mut rng = StdRng::seed_from_u64(3);
    let img = two_level_image(&mut rng, 40, 200, 20, 10);
    for method in [
        ThresholdMethod::Mean,
        ThresholdMethod::Otsu,
        ThresholdMethod::MeanShift,
    ] {
        let (binary, cutoff) = binarize(img.view(), method, false).unwrap();
        assert!((40..200).contains(&cutoff), "{method:?} -> {cutoff}");
        for (&src, &out) in img.data().iter().zip(binary.data()) {
            assert_eq!(out, if src == 200 { 255 } else { 0 });
        }
        let (inverted, _) = binarize(img.view(), method, true).unwrap();
        assert_eq!(inverted, binary.inverted());
    }
}

#[test]
fn mean_shift_reaches_fixed_point() {
    let mut rng = StdRng::seed_from_u64(5);
    let img = two_level_image(&mut rng, 10, 250, 12, 12);
    let (cutoff, rounds) = mean_shift_cutoff(&histogram(img.view()));
    assert_eq!(cutoff, 130);
    assert!(rounds >= 1);
}

#[test]
fn threshold_types_follow_their_tables() {
    let src = Plane::new(vec![10u8, 100, 101, 250], 4, 1).unwrap();
    let run = |kind| {
        let mut p = src.clone();
        apply_threshold(&mut p, 100, 200, kind);
        p.into_vec()
    };
    assert_eq!(run(ThresholdType::Binary), vec![0, 0, 200, 200]);
    assert_eq!(run(ThresholdType::BinaryInv), vec![200, 200, 0, 0]);
    assert_eq!(run(ThresholdType::Trunc), vec![10, 100, 100, 100]);
    assert_eq!(run(ThresholdType::ToZero), vec![0, 0, 101, 250]);
    assert_eq!(run(ThresholdType::ToZeroInv), vec![10, 100, 0, 0]);
}

#[test]
fn adaptive_threshold_follows_local_contrast() {
    // Left half dark with a brighter dot, right half bright with a darker dot.
    let (width, height) = (24usize, 12usize);
    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            data[y * width + x] = if x < width / 2 { 30 } else { 220 };
        }
    }
    data[6 * width + 5] = 80;
    data[6 * width + 18] = 170;
    let view = ImageView::from_slice(&data, width, height).unwrap();
    let out = adaptive_threshold(
        view,
        AdaptiveConfig {
            block_size: 2,
            constant: 5.0,
            invert: false,
        },
    )
    .unwrap();
    assert_eq!(*out.get(5, 6).unwrap(), 255);
    assert_eq!(*out.get(18, 6).unwrap(), 0);
    // Flat interior: v == mean > mean - constant.
    assert_eq!(*out.get(2, 2).unwrap(), 255);

    let err = adaptive_threshold(
        view,
        AdaptiveConfig {
            block_size: 0,
            ..AdaptiveConfig::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, PlaneScanError::InvalidParameter { name: "block_size", .. }));
}
