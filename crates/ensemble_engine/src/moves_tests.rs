use super::*;

#[test]
fn test_parse_plain_and_promotion() {
    let mv = Move::parse("a2a3").unwrap();
    assert_eq!(mv.from.to_algebraic(), "a2");
    assert_eq!(mv.to.to_algebraic(), "a3");
    assert!(!mv.promotion);

    let mv = Move::parse("a7a8q").unwrap();
    assert!(mv.promotion);
    assert_eq!(mv.to_string(), "a7a8q");

    let mv = Move::parse("H2G1Q").unwrap();
    assert!(mv.promotion);
    assert_eq!(mv.to_string(), "h2g1q");

    assert_eq!(Move::parse("E2E4").unwrap().to_string(), "e2e4");
    assert_eq!(Move::parse("a7a8Q").unwrap().to_string(), "a7a8q");
}

#[test]
fn test_parse_rejects_other_shapes() {
    for bad in [
        "", "a2", "a2a", "a2a3a4", "a7a8r", "a7a8n", "i2a3", "a0a3", "a2a9", "a2 a3", "é2e4",
        "e2e4q", "b6b7q",
    ] {
        assert!(
            matches!(Move::parse(bad), Err(EngineError::Format(_))),
            "'{bad}' should not parse"
        );
    }
}

#[test]
fn test_same_square_rejected() {
    assert!(matches!(Move::parse("e4e4"), Err(EngineError::Format(_))));
}

#[test]
fn test_from_indices_range() {
    assert!(Move::from_indices(0, 63).is_ok());
    assert!(matches!(
        Move::from_indices(12, 64),
        Err(EngineError::IllegalSquare(64))
    ));
}

#[test]
fn test_reversed_and_mirrored() {
    let mv: Move = "e2e4".parse().unwrap();
    assert_eq!(mv.reversed().to_string(), "e4e2");
    assert_eq!(mv.mirrored().to_string(), "e7e5");
}
