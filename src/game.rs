use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, error, info, warn};

use crate::action::{Action, BidCall, PLAYER_COUNT, PlayerId, Response, Rung, opponent};
use crate::action_space::ActionSpace;
use crate::card::{Card, HAND_SIZE, full_deck};
use crate::envido::{Envido, EnvidoCall, EnvidoStatus};
use crate::error::{GameError, IllegalAction};
use crate::score::{Award, AwardReason, Scoreboard};
use crate::state::{HandStateView, HandStatus, RuleSettings};
use crate::tricks::{PlayedCard, TrickEngine, TrickOutcome};
use crate::truco::{Truco, TrucoCall, TrucoStatus};

const DEFAULT_SEED: u64 = 0x7E0C_0CA5_5EED_0001;

/// Configuration required to bootstrap a hand.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub settings: RuleSettings,
    pub seed: u64,
    pub mano: PlayerId,
}

impl GameConfig {
    pub fn new(settings: RuleSettings, seed: u64) -> Result<Self, GameError> {
        settings.validate()?;
        Ok(Self {
            settings,
            seed,
            mano: 0,
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            settings: RuleSettings::default(),
            seed: DEFAULT_SEED,
            mano: 0,
        }
    }
}

/// Builder that enables deterministic deck or hand injection for tests and agents.
pub struct GameBuilder {
    config: GameConfig,
    deck: Option<Vec<Card>>,
    hands: Option<[Vec<Card>; PLAYER_COUNT]>,
    scoreboard: Scoreboard,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            deck: None,
            hands: None,
            scoreboard: Scoreboard::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_mano(mut self, mano: PlayerId) -> Self {
        self.config.mano = mano;
        self
    }

    pub fn with_settings(mut self, settings: RuleSettings) -> Self {
        self.config.settings = settings;
        self
    }

    /// Deal from `deck` (top card last) instead of a seeded shuffle.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Skip dealing altogether and hand out these cards, indexed by seat.
    pub fn with_hands(mut self, hands: [Vec<Card>; PLAYER_COUNT]) -> Self {
        self.hands = Some(hands);
        self
    }

    /// Continue from the totals of earlier hands.
    pub fn with_scoreboard(mut self, scoreboard: Scoreboard) -> Self {
        self.scoreboard = scoreboard;
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Which sub-protocol, if any, is waiting for an answer. Holding the pending call
/// inside the variant keeps envido and truco from ever being active together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivePhase {
    CardPlay,
    Bidding(EnvidoCall),
    Escalation(TrucoCall),
}

/// A validated action, ready to be applied.
#[derive(Clone, Copy, Debug)]
enum Step {
    Bid(EnvidoCall),
    Escalate {
        call: TrucoCall,
        raises: Option<TrucoCall>,
    },
    AnswerEnvido(EnvidoCall, Response),
    AnswerTruco(TrucoCall, Response),
    Play(Card),
    Fold,
}

/// One hand of truco between two seats: the dispatcher in front of envido, truco
/// and card play.
#[derive(Clone)]
pub struct Game {
    settings: RuleSettings,
    status: HandStatus,
    mano: PlayerId,
    phase: ActivePhase,
    envido: Envido,
    truco: Truco,
    tricks: TrickEngine,
    scoreboard: Scoreboard,
    awards: Vec<Award>,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder {
            config,
            ..GameBuilder::new()
        }
        .build()
    }

    /// Builder for the following hand: mano rotates and the scoreboard carries over.
    pub fn next_hand(&self, seed: u64) -> GameBuilder {
        GameBuilder::new()
            .with_settings(self.settings)
            .with_seed(seed)
            .with_mano(opponent(self.mano))
            .with_scoreboard(self.scoreboard.clone())
    }

    pub fn status(&self) -> HandStatus {
        self.status
    }

    pub fn settings(&self) -> RuleSettings {
        self.settings
    }

    pub fn mano(&self) -> PlayerId {
        self.mano
    }

    pub fn phase(&self) -> ActivePhase {
        self.phase
    }

    pub fn round(&self) -> usize {
        self.tricks.round()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, HandStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            HandStatus::Finished { winner } => winner,
            HandStatus::Ongoing => None,
        }
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn into_scoreboard(self) -> Scoreboard {
        self.scoreboard
    }

    /// Every score change of this hand, in order.
    pub fn awards(&self) -> &[Award] {
        &self.awards
    }

    pub fn hand(&self, player: PlayerId) -> Result<&[Card], GameError> {
        if player >= PLAYER_COUNT {
            return Err(GameError::InvalidPlayer(player));
        }
        Ok(self.tricks.hand(player))
    }

    pub fn cards_played(&self) -> &[PlayedCard] {
        self.tricks.played()
    }

    pub fn tricks(&self) -> &[TrickOutcome] {
        self.tricks.tricks()
    }

    /// The player expected to act next: the awaited responder, else the player to play.
    pub fn current_turn_holder(&self) -> PlayerId {
        match self.phase {
            ActivePhase::Bidding(pending) => pending.awaiting,
            ActivePhase::Escalation(pending) => pending.awaiting,
            ActivePhase::CardPlay => self.tricks.to_play(),
        }
    }

    pub fn is_envido_active(&self) -> bool {
        matches!(self.phase, ActivePhase::Bidding(_))
    }

    /// A truco call is awaiting an answer.
    pub fn is_truco_active(&self) -> bool {
        matches!(self.phase, ActivePhase::Escalation(_))
    }

    /// Truco has been called at some point this hand.
    pub fn is_truco_started(&self) -> bool {
        self.is_truco_active() || self.truco.accepted().is_some()
    }

    pub fn envido_status(&self) -> EnvidoStatus {
        match (self.phase, self.envido.outcome()) {
            (ActivePhase::Bidding(pending), _) => EnvidoStatus::Pending(pending),
            (_, Some(outcome)) => EnvidoStatus::Settled(outcome),
            (_, None) => EnvidoStatus::Open,
        }
    }

    pub fn truco_status(&self) -> TrucoStatus {
        if let ActivePhase::Escalation(pending) = self.phase {
            return TrucoStatus::Pending(pending);
        }
        match (self.truco.accepted(), self.truco.raise_holder()) {
            (Some(rung), Some(raise_holder)) => TrucoStatus::Accepted { rung, raise_holder },
            _ => TrucoStatus::NotCalled,
        }
    }

    pub fn state_view(&self, perspective: PlayerId) -> Result<HandStateView, GameError> {
        if perspective >= PLAYER_COUNT {
            return Err(GameError::InvalidPlayer(perspective));
        }
        Ok(HandStateView {
            settings: self.settings,
            status: self.status,
            self_player: perspective,
            mano: self.mano,
            turn_holder: self.current_turn_holder(),
            round: self.tricks.round(),
            hand: self.tricks.hand(perspective).to_vec(),
            opponent_hand_size: self.tricks.hand(opponent(perspective)).len(),
            cards_played: self.tricks.played().to_vec(),
            tricks: self.tricks.tricks().to_vec(),
            envido: self.envido_status(),
            truco: self.truco_status(),
            scoreboard: self.scoreboard.clone(),
            awards: self.awards.clone(),
        })
    }

    /// Every action `take_action` would accept from `player` right now.
    pub fn legal_actions(&self, player: PlayerId) -> Result<Vec<Action>, GameError> {
        if player >= PLAYER_COUNT {
            return Err(GameError::InvalidPlayer(player));
        }
        if self.is_finished() {
            return Ok(Vec::new());
        }
        let candidates = BidCall::ALL
            .into_iter()
            .map(Action::Bid)
            .chain(Rung::ALL.into_iter().map(Action::Escalate))
            .chain([Response::Accept, Response::Decline].map(Action::Respond))
            .chain(self.tricks.hand(player).iter().copied().map(Action::PlayCard))
            .chain(std::iter::once(Action::Fold));
        Ok(candidates
            .filter(|action| self.validate(player, *action).is_ok())
            .collect())
    }

    /// Applies `action` for `player`. Rejected actions leave the hand untouched and
    /// are logged; the caller may re-query [`Game::legal_actions`] and retry.
    pub fn take_action(&mut self, player: PlayerId, action: Action) -> Result<(), GameError> {
        let result = self.try_action(player, action);
        match &result {
            Ok(()) => {}
            Err(GameError::InvariantViolation(reason)) => {
                error!(player, %action, reason, "invariant violated, aborting hand");
                self.finish_hand(None);
            }
            Err(err) => warn!(player, %action, %err, "action rejected"),
        }
        result
    }

    /// Applies the action found at `index` of the [`ActionSpace`] catalog.
    pub fn take_action_index(&mut self, player: PlayerId, index: usize) -> Result<(), GameError> {
        match ActionSpace::index_to_action(index) {
            Some(action) => self.take_action(player, action),
            None => {
                warn!(player, index, "action index outside the catalog");
                Err(GameError::MalformedAction(index))
            }
        }
    }

    fn try_action(&mut self, player: PlayerId, action: Action) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::HandFinished);
        }
        if player >= PLAYER_COUNT {
            return Err(GameError::InvalidPlayer(player));
        }
        let step = self.validate(player, action)?;
        self.apply(player, step)
    }

    fn validate(&self, player: PlayerId, action: Action) -> Result<Step, IllegalAction> {
        let to_play = self.tricks.to_play();
        match action {
            Action::Bid(call) => {
                if self.tricks.round() > 0 {
                    return Err(IllegalAction::EnvidoAfterFirstRound);
                }
                if self.is_truco_started() {
                    return Err(IllegalAction::EnvidoAfterTruco);
                }
                let pending = match &self.phase {
                    ActivePhase::Bidding(pending) => Some(pending),
                    _ if player != to_play => return Err(IllegalAction::NotPlayersTurn),
                    _ => None,
                };
                self.envido.call(player, call, pending).map(Step::Bid)
            }
            Action::Escalate(rung) => match &self.phase {
                ActivePhase::Bidding(_) => Err(IllegalAction::TrucoDuringEnvido),
                ActivePhase::Escalation(pending) => self
                    .truco
                    .call(player, rung, Some(pending), to_play)
                    .map(|call| Step::Escalate {
                        call,
                        raises: Some(*pending),
                    }),
                ActivePhase::CardPlay => self
                    .truco
                    .call(player, rung, None, to_play)
                    .map(|call| Step::Escalate { call, raises: None }),
            },
            Action::Respond(response) => match self.phase {
                ActivePhase::Bidding(pending) if pending.awaiting == player => {
                    Ok(Step::AnswerEnvido(pending, response))
                }
                ActivePhase::Escalation(pending) if pending.awaiting == player => {
                    Ok(Step::AnswerTruco(pending, response))
                }
                _ => Err(IllegalAction::NothingToAnswer),
            },
            Action::PlayCard(card) => {
                if self.phase != ActivePhase::CardPlay {
                    return Err(IllegalAction::ResponsePending);
                }
                self.tricks.check_play(player, card)?;
                Ok(Step::Play(card))
            }
            Action::Fold => Ok(Step::Fold),
        }
    }

    fn apply(&mut self, player: PlayerId, step: Step) -> Result<(), GameError> {
        match step {
            Step::Bid(call) => {
                info!(player, call = %call.call, "envido called");
                self.phase = ActivePhase::Bidding(call);
            }
            Step::Escalate { call, raises } => {
                if let Some(raised) = raises {
                    self.truco.accept(raised);
                }
                info!(player, rung = %call.rung, "truco called");
                self.phase = ActivePhase::Escalation(call);
            }
            Step::AnswerEnvido(pending, response) => {
                self.phase = ActivePhase::CardPlay;
                let outcome = match response {
                    Response::Accept => {
                        let dealt = [self.tricks.dealt_hand(0), self.tricks.dealt_hand(1)];
                        self.envido.accept(pending, dealt, self.mano, &self.settings)
                    }
                    Response::Decline => self.envido.decline(pending, &self.settings),
                };
                self.update_score(outcome.winner, outcome.points, outcome.reason);
            }
            Step::AnswerTruco(pending, Response::Accept) => {
                self.truco.accept(pending);
                self.phase = ActivePhase::CardPlay;
                info!(player, rung = %pending.rung, "truco accepted");
            }
            Step::AnswerTruco(pending, Response::Decline) => {
                let (winner, points) = self.truco.decline(pending, &self.settings);
                self.phase = ActivePhase::CardPlay;
                self.update_score(winner, points, AwardReason::TrucoRefused);
                self.finish_hand(Some(winner));
            }
            Step::Play(card) => {
                let closed_trick = self.tricks.play(player, card)?;
                self.tricks.check_invariants()?;
                if closed_trick.is_some() {
                    match self.tricks.card_winner() {
                        Some(winner) => {
                            let points = self.truco.stake(&self.settings);
                            self.update_score(winner, points, AwardReason::Tricks);
                            self.finish_hand(Some(winner));
                        }
                        None => debug!(round = self.tricks.round(), "round finished"),
                    }
                }
            }
            Step::Fold => self.fold(player),
        }
        Ok(())
    }

    fn fold(&mut self, player: PlayerId) {
        info!(player, "player folded");
        match self.phase {
            ActivePhase::Bidding(pending) => {
                self.phase = ActivePhase::CardPlay;
                let outcome = self.envido.forfeit(pending, player, &self.settings);
                self.update_score(outcome.winner, outcome.points, outcome.reason);
            }
            ActivePhase::Escalation(_) | ActivePhase::CardPlay => {
                self.phase = ActivePhase::CardPlay;
                let winner = opponent(player);
                let points = self.truco.stake(&self.settings);
                self.update_score(winner, points, AwardReason::Fold);
                self.finish_hand(Some(winner));
            }
        }
    }

    fn update_score(&mut self, player: PlayerId, points: u32, reason: AwardReason) {
        self.scoreboard.add(player, points);
        self.awards.push(Award {
            player,
            points,
            reason,
        });
        info!(player, points, ?reason, "points awarded");
    }

    fn finish_hand(&mut self, winner: Option<PlayerId>) {
        if self.is_finished() {
            return;
        }
        self.status = HandStatus::Finished { winner };
        info!(?winner, scores = ?self.scoreboard.rows(), "hand finished");
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            deck,
            hands,
            scoreboard,
        } = builder;
        config.settings.validate()?;
        if config.mano >= PLAYER_COUNT {
            return Err(GameError::InvalidConfiguration("mano must be seat 0 or 1"));
        }
        let hands = match hands {
            Some(hands) => hands,
            None => {
                let mut deck = match deck {
                    Some(deck) => deck,
                    None => {
                        let mut rng = StdRng::seed_from_u64(config.seed);
                        let mut deck = full_deck();
                        deck.shuffle(&mut rng);
                        deck
                    }
                };
                deal(&mut deck, config.mano)?
            }
        };
        check_hands(&hands)?;
        debug!(mano = config.mano, "hand dealt");

        Ok(Game {
            settings: config.settings,
            status: HandStatus::Ongoing,
            mano: config.mano,
            phase: ActivePhase::CardPlay,
            envido: Envido::new(),
            truco: Truco::new(),
            tricks: TrickEngine::new(hands, config.mano),
            scoreboard,
            awards: Vec::new(),
        })
    }
}

/// Deals three cards each from the top of `deck`, mano first.
fn deal(deck: &mut Vec<Card>, mano: PlayerId) -> Result<[Vec<Card>; PLAYER_COUNT], GameError> {
    let mut hands: [Vec<Card>; PLAYER_COUNT] =
        std::array::from_fn(|_| Vec::with_capacity(HAND_SIZE));
    for _ in 0..HAND_SIZE {
        for seat in [mano, opponent(mano)] {
            let card = deck.pop().ok_or(GameError::InvalidConfiguration(
                "deck exhausted while dealing",
            ))?;
            hands[seat].push(card);
        }
    }
    Ok(hands)
}

fn check_hands(hands: &[Vec<Card>; PLAYER_COUNT]) -> Result<(), GameError> {
    if hands.iter().any(|hand| hand.len() != HAND_SIZE) {
        return Err(GameError::InvalidConfiguration(
            "each player must hold three cards",
        ));
    }
    if hands
        .iter()
        .flatten()
        .any(|card| Card::new(card.suit(), card.rank()).is_none())
    {
        return Err(GameError::InvalidConfiguration(
            "a dealt card is not part of the Spanish deck",
        ));
    }
    let mut seen = HashSet::new();
    if !hands.iter().flatten().all(|card| seen.insert(*card)) {
        return Err(GameError::InvalidConfiguration("a card was dealt twice"));
    }
    Ok(())
}
