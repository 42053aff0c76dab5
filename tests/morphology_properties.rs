use planescan::{
    close, dilate, distance_transform, erode, gradient, open, skeleton, thin, GradientKind,
    Plane, StructuringElement, ThinningConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_binary(rng: &mut StdRng, width: usize, height: usize, p: f64) -> Plane<u8> {
    let data = (0..width * height)
        .map(|_| if rng.random_bool(p) { 255 } else { 0 })
        .collect();
    Plane::new(data, width, height).unwrap()
}

fn blob(width: usize, height: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> Plane<u8> {
    let mut p = Plane::filled(width, height, 0u8).unwrap();
    for y in y0..=y1 {
        for x in x0..=x1 {
            *p.get_mut(x, y).unwrap() = 255;
        }
    }
    p
}

#[test]
fn erosion_of_complement_is_complement_of_dilation() {
    let mut rng = StdRng::seed_from_u64(0xd0a1);
    for (cols, rows) in [(3, 3), (5, 3), (1, 7), (4, 4), (2, 5)] {
        let se = StructuringElement::new(cols, rows).unwrap();
        let img = random_binary(&mut rng, 31, 19, 0.45);
        let lhs = erode(img.inverted().view(), se, 1).unwrap();
        let rhs = dilate(img.view(), se, 1).unwrap().inverted();
        assert_eq!(lhs, rhs, "element {cols}x{rows}");
    }
}

#[test]
fn iterations_chain_full_passes() {
    let mut rng = StdRng::seed_from_u64(42);
    let data = (0..25 * 25).map(|_| rng.random::<u8>()).collect();
    let img = Plane::new(data, 25, 25).unwrap();
    let se = StructuringElement::square(3).unwrap();

    let twice = erode(img.view(), se, 2).unwrap();
    let once = erode(img.view(), se, 1).unwrap();
    let chained = erode(once.view(), se, 1).unwrap();
    assert_eq!(twice, chained);
    assert_eq!(erode(img.view(), se, 0).unwrap(), img);
}

#[test]
fn opening_shrinks_and_closing_grows() {
    let mut rng = StdRng::seed_from_u64(9);
    let img = random_binary(&mut rng, 30, 30, 0.5);
    let se = StructuringElement::square(3).unwrap();
    let opened = open(img.view(), se, 1).unwrap();
    let closed = close(img.view(), se, 1).unwrap();
    for ((&o, &s), &c) in opened.data().iter().zip(img.data()).zip(closed.data()) {
        assert!(o <= s && s <= c);
    }
}

#[test]
fn gradients_outline_a_square() {
    let img = blob(12, 12, 3, 3, 8, 8);
    let se = StructuringElement::square(3).unwrap();

    let internal = gradient(img.view(), se, GradientKind::Internal).unwrap();
    assert_eq!(*internal.get(3, 3).unwrap(), 255);
    assert_eq!(*internal.get(5, 5).unwrap(), 0);
    assert_eq!(*internal.get(2, 3).unwrap(), 0);

    let external = gradient(img.view(), se, GradientKind::External).unwrap();
    assert_eq!(*external.get(2, 3).unwrap(), 255);
    assert_eq!(*external.get(3, 3).unwrap(), 0);

    let basic = gradient(img.view(), se, GradientKind::Basic { cutoff: 127 }).unwrap();
    assert_eq!(*basic.get(2, 3).unwrap(), 255);
    assert_eq!(*basic.get(3, 3).unwrap(), 255);
    assert_eq!(*basic.get(5, 5).unwrap(), 0);
}

#[test]
fn distance_is_one_on_boundary_and_grows_inward() {
    let img = blob(20, 16, 2, 3, 15, 12);
    let dist = distance_transform(img.view()).unwrap();
    let (w, h) = dist.dims();
    for y in 0..h {
        for x in 0..w {
            let fg = *img.get(x, y).unwrap() == 255;
            let d = *dist.get(x, y).unwrap();
            if !fg {
                assert_eq!(d, 0);
                continue;
            }
            let touches_bg = [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)].iter().any(|&(dx, dy)| {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                nx < 0
                    || ny < 0
                    || nx >= w as i32
                    || ny >= h as i32
                    || *img.get(nx as usize, ny as usize).unwrap() != 255
            });
            assert_eq!(d == 1, touches_bg, "({x},{y}) -> {d}");
        }
    }
    // Monotone along a row from the left boundary to the center.
    let row: Vec<u16> = (2..=8).map(|x| *dist.get(x, 7).unwrap()).collect();
    assert!(row.windows(2).all(|p| p[0] <= p[1]), "{row:?}");
    assert_eq!(row[0], 1);
}

#[test]
fn skeleton_is_a_subset_of_the_input() {
    let img = blob(21, 11, 1, 2, 19, 8);
    let skel = skeleton(img.view()).unwrap();
    assert!(skel.data().iter().any(|&v| v == 255));
    for (&s, &v) in skel.data().iter().zip(img.data()) {
        assert!(s == 0 || v == 255);
    }
    // The midline row of the bar survives.
    assert_eq!(*skel.get(10, 5).unwrap(), 255);
}

#[test]
fn thinning_reduces_a_bar_to_a_thin_stroke() {
    let img = blob(30, 12, 3, 3, 26, 8);
    let thinned = thin(img.view(), ThinningConfig::default()).unwrap();
    let kept = thinned.data().iter().filter(|&&v| v == 255).count();
    assert!(kept > 0);
    assert!(kept < img.data().iter().filter(|&&v| v == 255).count() / 3);
    for x in 8..22 {
        let column = (0..12).filter(|&y| *thinned.get(x, y).unwrap() == 255).count();
        assert_eq!(column, 1, "column {x}");
    }
}
