use planescan::{ColorPlanes, ImageView, IntegralImage, Plane, PlaneScanError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        PlaneScanError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        PlaneScanError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        PlaneScanError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();

    let roi = view.roi(1, 1, 2, 2).unwrap();
    assert_eq!(roi.dims(), (2, 2));
    assert_eq!(roi.stride(), 4);
    assert_eq!(roi.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(roi.row(1).unwrap(), &[9u8, 10u8]);
    assert!(roi.get(2, 0).is_none());

    let err = view.roi(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        PlaneScanError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn plane_rejects_length_mismatch() {
    let err = Plane::new(vec![0u8; 5], 2, 2).err().unwrap();
    assert_eq!(err, PlaneScanError::SizeMismatch { expected: 4, got: 5 });

    let roi_copy = {
        let data: Vec<u8> = (0u8..12).collect();
        let view = ImageView::from_slice(&data, 4, 3).unwrap();
        Plane::from_view(view.roi(1, 1, 3, 2).unwrap()).unwrap()
    };
    assert_eq!(roi_copy.data(), &[5, 6, 7, 9, 10, 11]);
}

#[test]
fn color_planes_convert_with_fixed_point_luma() {
    let rgb = [255u8, 255, 255, 255, 0, 0, 0, 255, 0, 0, 0, 255];
    let color = ColorPlanes::from_interleaved(&rgb, 4, 1).unwrap();
    let gray = color.to_gray();
    let expected = |r: u32, g: u32, b: u32| ((77 * r + 150 * g + 29 * b + 128) >> 8) as u8;
    assert_eq!(
        gray.data(),
        &[
            expected(255, 255, 255),
            expected(255, 0, 0),
            expected(0, 255, 0),
            expected(0, 0, 255)
        ]
    );
    assert_eq!(gray.data()[0], 255);
    assert!(ColorPlanes::from_interleaved(&rgb[..11], 4, 1).is_err());
}

#[test]
fn integral_rect_sums_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let (width, height) = (23usize, 17usize);
    let data: Vec<u8> = (0..width * height).map(|_| rng.random()).collect();
    let view = ImageView::from_slice(&data, width, height).unwrap();
    let integral = IntegralImage::build(view, true);

    for _ in 0..200 {
        let x = rng.random_range(0..width);
        let y = rng.random_range(0..height);
        let w = rng.random_range(1..=width - x);
        let h = rng.random_range(1..=height - y);

        let mut sum = 0u64;
        let mut sq = 0u64;
        for yy in y..y + h {
            for xx in x..x + w {
                let v = u64::from(data[yy * width + xx]);
                sum += v;
                sq += v * v;
            }
        }
        assert_eq!(integral.rect_sum(x as isize, y as isize, w, h), sum);
        assert_eq!(
            integral.rect_square_sum(x as isize, y as isize, w, h),
            Some(sq)
        );
    }
}

#[test]
fn integral_queries_clamp_to_bounds() {
    let data = vec![1u8; 25];
    let view = ImageView::from_slice(&data, 5, 5).unwrap();
    let integral = IntegralImage::build(view, false);

    assert_eq!(integral.rect_sum(-2, -2, 4, 4), 4);
    assert_eq!(integral.rect_sum(3, 3, 10, 10), 4);
    assert_eq!(integral.rect_sum(7, 0, 2, 2), 0);
    assert_eq!(integral.rect_square_sum(0, 0, 2, 2), None);
    assert_eq!(integral.centered_sum(0, 0, 1, 1), (4, 4));
}
