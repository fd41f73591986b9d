use rand::SeedableRng;
use rand::rngs::StdRng;
use truco::{Bot, Game, GameBuilder, GameError, HeuristicBot, RandomBot, create_bot_from_spec};

fn play_hand(game: &mut Game, bots: &mut [Box<dyn Bot>; 2]) -> Result<(), GameError> {
    while !game.is_finished() {
        let current = game.current_turn_holder();
        let state = game.state_view(current)?;
        let legal = game.legal_actions(current)?;
        let action = bots[current].select_action(&state, &legal);
        assert!(legal.contains(&action), "bot chose an illegal action");
        game.take_action(current, action)?;
    }
    Ok(())
}

#[test]
fn heuristic_and_random_bots_finish_a_match() -> Result<(), GameError> {
    let mut bots: [Box<dyn Bot>; 2] = [
        Box::new(HeuristicBot::default()),
        Box::new(RandomBot::new(StdRng::seed_from_u64(11))),
    ];
    let mut game = GameBuilder::new().with_seed(3).build()?;
    let mut hands = 0u64;
    loop {
        play_hand(&mut game, &mut bots)?;
        hands += 1;
        assert!(game.winner().is_some());
        if game.scoreboard().reached(15).is_some() {
            break;
        }
        assert!(hands < 200, "match did not converge");
        game = game.next_hand(hands).build()?;
    }
    assert_eq!(game.mano(), ((hands - 1) % 2) as usize);
    Ok(())
}

#[test]
fn registry_bots_only_pick_legal_actions() -> Result<(), GameError> {
    for seed in 0..20 {
        let mut bots: [Box<dyn Bot>; 2] = [
            create_bot_from_spec("random", 0, seed).expect("random spec"),
            create_bot_from_spec("heuristic", 1, seed).expect("heuristic spec"),
        ];
        let mut game = GameBuilder::new().with_seed(seed).build()?;
        play_hand(&mut game, &mut bots)?;
        let awarded: u32 = game.awards().iter().map(|award| award.points).sum();
        assert_eq!(game.scoreboard().total(), awarded);
    }
    Ok(())
}

#[test]
fn heuristic_accepts_envido_with_a_strong_count() -> Result<(), GameError> {
    use truco::{Action, BidCall, Card, Response, Suit};
    let card = |suit, rank| Card::new(suit, rank).expect("valid card");
    let mut game = GameBuilder::new()
        .with_hands([
            vec![card(Suit::Bastos, 4), card(Suit::Copas, 5), card(Suit::Oros, 6)],
            vec![card(Suit::Oros, 7), card(Suit::Oros, 5), card(Suit::Copas, 12)],
        ])
        .build()?;
    game.take_action(0, Action::Bid(BidCall::Envido))?;
    let state = game.state_view(1)?;
    let legal = game.legal_actions(1)?;
    let mut bot = HeuristicBot::default();
    // 32 points clears the raise threshold.
    assert_eq!(
        bot.select_action(&state, &legal),
        Action::Bid(BidCall::FaltaEnvido)
    );
    let weak = HeuristicBot {
        raise_envido_at: 40,
        ..HeuristicBot::default()
    }
    .select_action(&state, &legal);
    assert_eq!(weak, Action::Respond(Response::Accept));
    Ok(())
}
