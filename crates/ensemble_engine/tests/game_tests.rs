use ensemble_engine::{
    DecisionTag, EnsembleConfig, FnPredictor, Game, MemoryStore, Move, NoisyEchoPredictor,
    OracleAdapter, Position, PositionText, Predictor, ProbabilityTensor, SessionStore,
};

fn echo_game(parallel: bool) -> Game {
    let predictors: Vec<Box<dyn Predictor>> = vec![
        Box::new(NoisyEchoPredictor::seeded("echo-1", 0.05, 1)),
        Box::new(NoisyEchoPredictor::seeded("echo-2", 0.05, 2)),
        Box::new(FnPredictor::new("short", |_: &ProbabilityTensor| Ok(vec![0.0; 100]))),
    ];
    Game::new(
        EnsembleConfig {
            parallel,
            ..EnsembleConfig::default()
        },
        predictors,
    )
}

#[test]
fn echo_ensemble_replies_with_legal_moves() {
    let game = echo_game(true);
    let adapter = OracleAdapter::standard();
    let mut store = MemoryStore::new();
    game.new_game(&mut store, "demo", None).unwrap();

    let before = Position::parse(&store.get("demo").unwrap().unwrap()).unwrap();
    let outcome = game.play_turn(&mut store, "demo", "e2e4").unwrap();
    let after_human = ensemble_engine::apply(&before, Move::parse("e2e4").unwrap());

    let reply = outcome.engine_move().unwrap();
    // Echoes predict "no move"; only similarity can decide.
    assert_eq!(reply.tag, DecisionTag::BestSimilarity);
    assert_eq!(reply.votes, 2);
    assert!(
        adapter
            .is_legal(&after_human.to_text(), reply.mv)
            .unwrap()
    );
    assert_eq!(store.get("demo").unwrap(), Some(outcome.text.clone()));
    assert_eq!(
        Position::parse(&outcome.text).unwrap().side_to_move,
        chess_core::Color::White
    );
}

#[test]
fn seeded_games_are_reproducible() {
    let play = |parallel| {
        let game = echo_game(parallel);
        let mut store = MemoryStore::new();
        game.new_game(&mut store, "g", None).unwrap();
        game.play_turn(&mut store, "g", "d2d4").unwrap().text
    };
    assert_eq!(play(true), play(false));
}

#[test]
fn config_file_drives_the_resolver() {
    let path = std::env::temp_dir().join(format!("ensemble-config-{}.toml", std::process::id()));
    std::fs::write(&path, "confidence_mode = \"squared\"\nparallel = false\n").unwrap();
    let config = EnsembleConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let game = Game::new(config, Vec::new());
    assert!(!game.resolver().config().parallel);

    let mut store = MemoryStore::new();
    game.new_game(&mut store, "g", Some(PositionText::from("k7/2Q5/1K6/8/8/8/8/8 w - - 0 1")))
        .unwrap();
    // After Qc6+ Black still has Kb8, but nobody is there to find it.
    assert!(matches!(
        game.play_turn(&mut store, "g", "c7c6"),
        Err(ensemble_engine::EngineError::NoPredictions)
    ));
}
