use approx::assert_relative_eq;
use hydronorm_boxcox::PowerTransform;
use ndarray::{ArrayD, IxDyn};

#[test]
fn station_matrix_round_trip() {
    let pt = PowerTransform::new(4.0).expect("valid exponent");
    let data = ArrayD::from_shape_fn(IxDyn(&[3, 50]), |idx| {
        let (s, t) = (idx[0] as f64, idx[1] as f64);
        ((s + 1.0) * t * 0.37) % 23.0
    });

    let back = pt.inverse_array(pt.forward_array(data.view()).view());

    for (orig, rec) in data.iter().zip(back.iter()) {
        assert_relative_eq!(orig, rec, epsilon = 1e-9);
    }
}

#[test]
fn negative_input_reconstructs_as_zero() {
    let pt = PowerTransform::new(4.0).expect("valid exponent");
    let data = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![-1.0, 0.0, 2.0, -0.5]).unwrap();

    let back = pt.inverse_array(pt.forward_array(data.view()).view());

    let expected = [0.0, 0.0, 2.0, 0.0];
    for (rec, exp) in back.iter().zip(expected.iter()) {
        assert_relative_eq!(rec, exp, epsilon = 1e-12);
    }
}

#[test]
fn transformed_values_are_bounded_below_by_minus_exponent() {
    let pt = PowerTransform::new(3.0).expect("valid exponent");
    for &x in &[0.0, 1e-9, 0.3, 5.0] {
        assert!(pt.forward(x) >= -3.0);
    }
}
