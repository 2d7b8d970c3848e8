use super::*;
use crate::grid::Label;

#[test]
fn test_from_flat_rejects_wrong_length() {
    assert!(matches!(
        ProbabilityTensor::from_flat(vec![0.0; TENSOR_LEN - 1]),
        Err(EngineError::Decode(_))
    ));
    assert!(ProbabilityTensor::from_flat(vec![0.0; TENSOR_LEN]).is_ok());
}

#[test]
fn test_from_flat_rejects_nan() {
    let mut scores = vec![0.0; TENSOR_LEN];
    scores[14] = f32::NAN;
    let err = ProbabilityTensor::from_flat(scores).unwrap_err();
    assert!(err.to_string().contains("square 1 category 1"));
}

#[test]
fn test_from_rows_checks_per_square_length() {
    let mut rows = vec![vec![0.0; CATEGORIES]; SQUARES];
    rows[5] = vec![0.0; 12];
    let err = ProbabilityTensor::from_rows(rows).unwrap_err();
    assert!(err.to_string().contains("square 5"));

    let rows = vec![vec![0.5; CATEGORIES]; SQUARES];
    let t = ProbabilityTensor::from_rows(rows).unwrap();
    assert_eq!(t.as_slice().len(), TENSOR_LEN);
}

#[test]
fn test_argmax_prefers_lowest_index_on_ties() {
    assert_eq!(argmax(&[0.2, 0.7, 0.7, 0.1]), 1);
    assert_eq!(argmax(&[0.0; CATEGORIES]), 0);
    assert_eq!(argmax(&[0.1, 0.2, 0.9]), 2);
}

#[test]
fn test_add_and_dot() {
    let mut a = ProbabilityTensor::zeros();
    a.square_mut(Square::new(0).unwrap())[3] = 2.0;
    let mut b = ProbabilityTensor::zeros();
    b.square_mut(Square::new(0).unwrap())[3] = 0.5;
    b.square_mut(Square::new(1).unwrap())[0] = 1.0;

    assert_eq!(a.dot(&b), 1.0);
    a += &b;
    assert_eq!(a.square(Square::new(0).unwrap())[3], 2.5);
    assert_eq!(a.square(Square::new(1).unwrap())[0], 1.0);
}

#[test]
fn test_dot_grid_matches_one_hot_dot() {
    let mut grid = CategoricalGrid::empty();
    grid.set(Square::new(10).unwrap(), Label::WhiteQueen);
    let mut t = ProbabilityTensor::zeros();
    t.square_mut(Square::new(10).unwrap())[Label::WhiteQueen.index()] = 0.8;
    t.square_mut(Square::new(11).unwrap())[Label::Empty.index()] = 0.4;
    t.square_mut(Square::new(11).unwrap())[Label::BlackPawn.index()] = 0.6;
    // 0.8 on the queen square + 0.4 on the empty square
    assert!((t.dot_grid(&grid) - 1.2).abs() < 1e-6);
}
