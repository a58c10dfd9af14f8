//! The concentration session state machine.
//!
//! `GameSession` is the single authority over one table: which cards are
//! face-up, which are matched, the score, and focus mode. Hosts feed it
//! commands (`flip`, `restrict_to_four`, round navigation) and clock ticks
//! (`advance`), then read its state or listen for events.
//!
//! ## Timing
//!
//! A second flip does not evaluate immediately. Evaluation is queued
//! `reveal_delay_ms` ahead, and a miss queues the flip-back a further
//! `revert_delay_ms` ahead. Until evaluation runs, no third card can be
//! flipped. Queued work is tagged with the session generation and discarded
//! if the round was restarted in between.

use std::sync::Arc;

use im::{OrdSet, Vector};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, info, trace};

use super::events::{SessionEvent, SessionListener};
use super::scheduler::{DeferredTask, Scheduler, TaskKind};
use super::snapshot::SessionSnapshot;
use super::{FlipOutcome, FlipRejection, RestrictError};
use crate::cards::{deal, CardCatalog, CardFace, GameCard, PairId};
use crate::core::{GameRng, SessionConfig, SessionError};
use crate::render::Renderer;
use crate::rules::{select_four, ActiveSet, DisplayPolicy, MatchOutcome, Round, FOCUS_SIZE};

/// Face-up cards awaiting evaluation, in flip order.
pub type FlipBuffer = SmallVec<[usize; 2]>;

/// One concentration table.
pub struct GameSession {
    config: SessionConfig,
    catalog: Arc<CardCatalog>,
    rng: GameRng,

    round: Round,
    attempts: u32,
    score: i64,
    cards: Vector<GameCard>,
    matched_pair_ids: OrdSet<PairId>,
    flipped: FlipBuffer,

    restricted: bool,
    active: ActiveSet,

    in_play: bool,
    generation: u64,
    scheduler: Scheduler,
    listeners: Vec<Box<dyn SessionListener>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("round", &self.round)
            .field("attempts", &self.attempts)
            .field("score", &self.score)
            .field("matched", &self.matched_pair_ids.len())
            .field("flipped", &self.flipped)
            .field("restricted", &self.restricted)
            .field("active", &self.active)
            .field("in_play", &self.in_play)
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl GameSession {
    /// Create an idle session. Nothing is dealt until `start_round`.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let score = config.starting_score;
        Self {
            config,
            catalog: Arc::new(CardCatalog::new()),
            rng,
            round: Round::FIRST,
            attempts: 0,
            score,
            cards: Vector::new(),
            matched_pair_ids: OrdSet::new(),
            flipped: FlipBuffer::new(),
            restricted: false,
            active: ActiveSet::new(),
            in_play: false,
            generation: 0,
            scheduler: Scheduler::new(),
            listeners: Vec::new(),
        }
    }

    /// Create a session and deal round one.
    pub fn start(catalog: Arc<CardCatalog>, config: SessionConfig) -> Result<Self, SessionError> {
        let mut session = Self::new(config);
        session.start_round(catalog, Round::FIRST)?;
        Ok(session)
    }

    /// Register a listener for session events.
    pub fn add_listener(&mut self, listener: Box<dyn SessionListener>) {
        self.listeners.push(listener);
    }

    // === Commands ===

    /// Deal a fresh, shuffled table for `round` and reset all round state.
    ///
    /// Any queued evaluation or flip-back from the previous table is dropped.
    pub fn start_round(&mut self, catalog: Arc<CardCatalog>, round: Round) -> Result<(), SessionError> {
        if catalog.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }

        let mut cards = deal(&catalog);
        self.rng.shuffle(&mut cards);
        let was_restricted = self.restricted;

        self.cards = cards.into_iter().collect();
        self.catalog = catalog;
        self.round = round;
        self.attempts = 0;
        self.score = self.config.starting_score;
        self.matched_pair_ids = OrdSet::new();
        self.flipped.clear();
        self.restricted = false;
        self.active.clear();
        self.in_play = true;
        self.bump_generation();

        info!(
            round = round.number(),
            cards = self.cards.len(),
            generation = self.generation,
            "round started"
        );
        if was_restricted {
            self.emit(SessionEvent::RestrictionEnded);
        }
        Ok(())
    }

    /// Turn a card face-up.
    ///
    /// Invalid flips change nothing and report why. The second flip of a
    /// pair counts an attempt and queues evaluation.
    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if let Err(reason) = self.check_flip(index) {
            trace!(index, ?reason, "flip rejected");
            return FlipOutcome::Rejected(reason);
        }

        if let Some(card) = self.cards.get_mut(index) {
            card.is_flipped = true;
        }
        self.flipped.push(index);

        if self.flipped.len() < 2 {
            debug!(index, "card flipped");
            return FlipOutcome::Flipped;
        }

        self.attempts += 1;
        self.scheduler
            .schedule(self.config.reveal_delay_ms, self.generation, TaskKind::Evaluate);
        debug!(index, attempts = self.attempts, "pair revealed, evaluation queued");
        FlipOutcome::PairRevealed
    }

    /// Evaluate the two face-up cards now instead of waiting for the clock.
    ///
    /// Returns `None` unless exactly two cards are face-up. The queued
    /// evaluation is cancelled; queued flip-backs are kept.
    pub fn evaluate(&mut self) -> Option<MatchOutcome> {
        if self.flipped.len() != 2 {
            return None;
        }
        self.scheduler.cancel(|task| task.kind == TaskKind::Evaluate);
        self.resolve_flipped()
    }

    /// Narrow play to four cards, at a flat score cost.
    pub fn restrict_to_four(&mut self) -> Result<ActiveSet, RestrictError> {
        if !self.in_play {
            return Err(RestrictError::Inactive);
        }
        if self.restricted {
            return Err(RestrictError::AlreadyRestricted);
        }

        let unmatched: Vec<(usize, PairId)> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.is_matched)
            .map(|(index, card)| (index, card.pair_id))
            .collect();
        if unmatched.len() < FOCUS_SIZE {
            return Err(RestrictError::NotEnoughCards {
                remaining: unmatched.len(),
            });
        }

        self.active = select_four(&unmatched, &mut self.rng);
        self.restricted = true;
        debug!(active = ?self.active, "focus mode started");

        self.apply_score(-i64::from(self.config.restriction_penalty));
        self.emit(SessionEvent::RestrictionStarted);
        Ok(self.active.clone())
    }

    /// Leave focus mode. Returns false if it was not on.
    ///
    /// Every face-up unmatched card turns back over, and any queued work is
    /// dropped with it.
    pub fn exit_restriction(&mut self) -> bool {
        if !self.restricted {
            return false;
        }

        self.restricted = false;
        self.active.clear();
        self.turn_down_unmatched();
        self.bump_generation();

        debug!("focus mode ended");
        self.emit(SessionEvent::RestrictionEnded);
        true
    }

    /// Restart on the next round. Returns false past the last round.
    pub fn next_round(&mut self) -> bool {
        match self.round.next() {
            Some(round) => self.restart_at(round),
            None => false,
        }
    }

    /// Restart on the previous round. Returns false before the first round.
    pub fn previous_round(&mut self) -> bool {
        match self.round.previous() {
            Some(round) => self.restart_at(round),
            None => false,
        }
    }

    /// Leave game mode. Queued work is dropped, focus mode is switched off
    /// and further commands are rejected until the next `start_round`.
    pub fn end(&mut self) {
        if !self.in_play {
            return;
        }
        let was_restricted = self.restricted;
        self.in_play = false;
        self.restricted = false;
        self.active.clear();
        self.flipped.clear();
        self.bump_generation();
        info!(score = self.score, attempts = self.attempts, "session ended");
        if was_restricted {
            self.emit(SessionEvent::RestrictionEnded);
        }
    }

    // === Clock ===

    /// Move the clock forward and run every task that comes due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.scheduler.now_ms().saturating_add(elapsed_ms);
        while let Some(task) = self.scheduler.pop_due(target) {
            self.run_task(task);
        }
        self.scheduler.advance_to(target);
    }

    /// Run every queued task, however far ahead it is.
    pub fn settle(&mut self) {
        while let Some(task) = self.scheduler.pop_due(u64::MAX) {
            self.run_task(task);
        }
    }

    /// Current clock time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Number of tasks waiting on the clock.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    // === Read-only state ===

    /// Current score.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Pairs revealed this round.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Round being played.
    #[must_use]
    pub fn round(&self) -> Round {
        self.round
    }

    /// Hints the current round shows.
    #[must_use]
    pub fn display_policy(&self) -> DisplayPolicy {
        self.round.display_policy()
    }

    /// The dealt table, in shuffled order.
    #[must_use]
    pub fn cards(&self) -> &Vector<GameCard> {
        &self.cards
    }

    /// Card at a table index.
    #[must_use]
    pub fn card(&self, index: usize) -> Option<&GameCard> {
        self.cards.get(index)
    }

    /// Vocabulary the table was dealt from.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// Pairs matched this round.
    #[must_use]
    pub fn matched_pair_ids(&self) -> &OrdSet<PairId> {
        &self.matched_pair_ids
    }

    /// Number of pairs matched this round.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched_pair_ids.len()
    }

    /// Face-up cards awaiting evaluation, in flip order.
    #[must_use]
    pub fn flipped_indices(&self) -> &[usize] {
        &self.flipped
    }

    /// Is focus mode on?
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// Table indices playable in focus mode. Empty outside it.
    #[must_use]
    pub fn active_indices(&self) -> &[usize] {
        &self.active
    }

    /// Is the session accepting commands?
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.in_play
    }

    /// Counter bumped whenever queued work must be discarded.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Every entry in the catalog has been matched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.catalog.is_empty() && self.matched_pair_ids.len() == self.catalog.len()
    }

    /// Focus mode is on and all of its cards are matched.
    #[must_use]
    pub fn is_restricted_complete(&self) -> bool {
        self.restricted
            && self
                .active
                .iter()
                .all(|&i| self.cards.get(i).is_some_and(|card| card.is_matched))
    }

    /// Copy the session for drawing or saving.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            round: self.round,
            attempts: self.attempts,
            score: self.score,
            cards: self.cards.clone(),
            matched_pair_ids: self.matched_pair_ids.clone(),
            flipped_indices: self.flipped.clone(),
            is_restricted: self.restricted,
            active_indices: self.active.clone(),
            is_active: self.in_play,
            generation: self.generation,
            rng: self.rng.state(),
        }
    }

    /// Hand the current table to a renderer.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.draw(&self.snapshot(), &self.catalog);
    }

    // === Saved sessions ===

    /// Rebuild a session from a snapshot taken against `catalog`.
    ///
    /// Face-up unmatched cards come back face-down; queued work is not
    /// restored.
    pub fn resume(
        catalog: Arc<CardCatalog>,
        snapshot: SessionSnapshot,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        validate_snapshot(&catalog, &snapshot)?;
        let generation = snapshot.generation.checked_add(1).ok_or_else(|| {
            SessionError::SnapshotMismatch("generation counter is exhausted".into())
        })?;

        let mut session = Self::new(config);
        session.catalog = catalog;
        session.rng = GameRng::from_state(&snapshot.rng);
        session.round = snapshot.round;
        session.attempts = snapshot.attempts;
        session.score = snapshot.score;
        session.cards = snapshot.cards;
        session.matched_pair_ids = snapshot.matched_pair_ids;
        session.restricted = snapshot.is_restricted;
        session.active = snapshot.active_indices;
        session.in_play = true;
        session.generation = generation;
        session.turn_down_unmatched();

        info!(
            round = session.round.number(),
            matched = session.matched_count(),
            "session resumed"
        );
        Ok(session)
    }

    // === Internals ===

    fn check_flip(&self, index: usize) -> Result<(), FlipRejection> {
        if !self.in_play {
            return Err(FlipRejection::Inactive);
        }
        let card = self.cards.get(index).ok_or(FlipRejection::OutOfRange)?;
        if card.is_matched {
            return Err(FlipRejection::AlreadyMatched);
        }
        if card.is_flipped {
            return Err(FlipRejection::AlreadyFlipped);
        }
        if self.flipped.len() >= 2 {
            return Err(FlipRejection::PairPending);
        }
        if self.restricted && !self.active.contains(&index) {
            return Err(FlipRejection::OutsideFocus);
        }
        Ok(())
    }

    fn resolve_flipped(&mut self) -> Option<MatchOutcome> {
        let (a, b) = match self.flipped.as_slice() {
            &[a, b] => (a, b),
            _ => return None,
        };
        let card_a = *self.cards.get(a)?;
        let card_b = *self.cards.get(b)?;
        self.flipped.clear();

        let outcome = self.config.scoring.evaluate(&card_a, &card_b, self.restricted);
        debug!(a, b, is_match = outcome.is_match, delta = outcome.score_delta, "pair evaluated");
        self.apply_score(outcome.score_delta);

        if outcome.is_match {
            for index in [a, b] {
                if let Some(card) = self.cards.get_mut(index) {
                    card.is_matched = true;
                }
            }
            self.matched_pair_ids.insert(card_a.pair_id);
            self.emit(SessionEvent::Matched(card_a.pair_id));

            if self.is_complete() {
                info!(
                    round = self.round.number(),
                    score = self.score,
                    attempts = self.attempts,
                    "round complete"
                );
                self.emit(SessionEvent::RoundComplete { round: self.round });
            }
        } else {
            self.scheduler.schedule(
                self.config.revert_delay_ms,
                self.generation,
                TaskKind::Revert([a, b]),
            );
        }

        if self.config.auto_exit_restriction && self.is_restricted_complete() {
            self.exit_restriction();
        }

        Some(outcome)
    }

    fn run_task(&mut self, task: DeferredTask) {
        if task.generation != self.generation {
            debug!(?task, current = self.generation, "dropping stale task");
            return;
        }
        match task.kind {
            TaskKind::Evaluate => {
                self.resolve_flipped();
            }
            TaskKind::Revert(indices) => {
                for index in indices {
                    if let Some(card) = self.cards.get_mut(index) {
                        if !card.is_matched {
                            card.is_flipped = false;
                        }
                    }
                }
                trace!(?indices, "missed pair turned back over");
            }
        }
    }

    fn restart_at(&mut self, round: Round) -> bool {
        if !self.in_play {
            return false;
        }
        let catalog = Arc::clone(&self.catalog);
        self.start_round(catalog, round).is_ok()
    }

    fn turn_down_unmatched(&mut self) {
        for card in self.cards.iter_mut() {
            if !card.is_matched {
                card.is_flipped = false;
            }
        }
        self.flipped.clear();
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        let dropped = self.scheduler.cancel_stale(self.generation);
        if dropped > 0 {
            debug!(dropped, generation = self.generation, "discarded queued tasks");
        }
    }

    fn apply_score(&mut self, delta: i64) {
        self.score += delta;
        self.emit(SessionEvent::ScoreChanged {
            delta,
            score: self.score,
        });
    }

    fn emit(&mut self, event: SessionEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }
}

fn validate_snapshot(catalog: &CardCatalog, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
    let mismatch = |reason: String| Err(SessionError::SnapshotMismatch(reason));

    if catalog.is_empty() {
        return Err(SessionError::EmptyCatalog);
    }
    if snapshot.cards.len() != catalog.len() * 2 {
        return mismatch(format!(
            "{} cards for {} catalog entries",
            snapshot.cards.len(),
            catalog.len()
        ));
    }

    let mut faces: FxHashMap<PairId, SmallVec<[CardFace; 2]>> = FxHashMap::default();
    for card in &snapshot.cards {
        if !catalog.contains(card.pair_id.card_id()) {
            return mismatch(format!("{} is not in the catalog", card.pair_id));
        }
        faces.entry(card.pair_id).or_default().push(card.face);
    }
    if let Some((pair, _)) = faces
        .iter()
        .find(|(_, f)| f.len() != 2 || f[0] == f[1])
    {
        return mismatch(format!("{pair} does not have one card per face"));
    }

    if let Some(pair) = snapshot
        .matched_pair_ids
        .iter()
        .find(|pair| !catalog.contains(pair.card_id()))
    {
        return mismatch(format!("matched {pair} is not in the catalog"));
    }
    let mut matched_cards: FxHashMap<PairId, usize> = FxHashMap::default();
    for card in snapshot.cards.iter().filter(|card| card.is_matched) {
        *matched_cards.entry(card.pair_id).or_default() += 1;
    }
    if let Some(pair) = matched_cards
        .iter()
        .find(|&(pair, &count)| count != 2 || !snapshot.matched_pair_ids.contains(pair))
        .map(|(pair, _)| *pair)
    {
        return mismatch(format!("{pair} is half matched or missing from the matched set"));
    }
    if let Some(pair) = snapshot
        .matched_pair_ids
        .iter()
        .find(|pair| !matched_cards.contains_key(*pair))
    {
        return mismatch(format!("matched {pair} has no matched cards"));
    }

    if let Some(index) = snapshot
        .active_indices
        .iter()
        .find(|&&i| i >= snapshot.cards.len())
    {
        return mismatch(format!("active index {index} is off the table"));
    }
    if snapshot.is_restricted {
        let mut distinct = snapshot.active_indices.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() != FOCUS_SIZE || snapshot.active_indices.len() != FOCUS_SIZE {
            return mismatch(format!(
                "focus mode needs {FOCUS_SIZE} distinct cards, found {:?}",
                snapshot.active_indices
            ));
        }
    } else if !snapshot.active_indices.is_empty() {
        return mismatch("active cards without focus mode".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};
    use crate::session::EventLog;

    fn catalog(n: u32) -> Arc<CardCatalog> {
        let defs = (1..=n).map(|i| CardDefinition::new(CardId::new(i), format!("k{i}"), format!("r{i}")));
        Arc::new(CardCatalog::from_definitions(defs).unwrap())
    }

    fn session(n: u32) -> GameSession {
        GameSession::start(catalog(n), SessionConfig::default()).unwrap()
    }

    /// Table indices of the two faces of `pair`.
    fn faces_of(session: &GameSession, pair: PairId) -> (usize, usize) {
        let kanji = session
            .cards()
            .iter()
            .position(|c| c.pair_id == pair && c.face == CardFace::Kanji)
            .unwrap();
        let romaji = session
            .cards()
            .iter()
            .position(|c| c.pair_id == pair && c.face == CardFace::Romaji)
            .unwrap();
        (kanji, romaji)
    }

    #[test]
    fn test_new_session_is_idle() {
        let mut session = GameSession::new(SessionConfig::default());
        assert!(!session.is_active());
        assert_eq!(session.flip(0), FlipOutcome::Rejected(FlipRejection::Inactive));
        assert!(!session.next_round());
        assert_eq!(session.restrict_to_four(), Err(RestrictError::Inactive));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = GameSession::start(Arc::new(CardCatalog::new()), SessionConfig::default())
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyCatalog));
    }

    #[test]
    fn test_start_round_deals_and_resets() {
        let session = session(3);
        assert_eq!(session.cards().len(), 6);
        assert_eq!(session.score(), 1000);
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.round(), Round::FIRST);
        assert_eq!(session.generation(), 1);
        assert!(session.cards().iter().all(GameCard::is_face_down));
    }

    #[test]
    fn test_flip_rejections() {
        let mut session = session(3);

        assert_eq!(session.flip(99), FlipOutcome::Rejected(FlipRejection::OutOfRange));
        assert_eq!(session.flip(0), FlipOutcome::Flipped);
        assert_eq!(session.flip(0), FlipOutcome::Rejected(FlipRejection::AlreadyFlipped));
        assert_eq!(session.flip(1), FlipOutcome::PairRevealed);
        assert_eq!(session.flip(2), FlipOutcome::Rejected(FlipRejection::PairPending));
        assert_eq!(session.flipped_indices().len(), 2);
    }

    #[test]
    fn test_evaluation_waits_for_reveal_delay() {
        let mut session = session(3);
        let (k, r) = faces_of(&session, PairId(1));

        session.flip(k);
        session.flip(r);
        session.advance(999);
        assert_eq!(session.matched_count(), 0);
        assert_eq!(session.flipped_indices().len(), 2);

        session.advance(1);
        assert_eq!(session.matched_count(), 1);
        assert_eq!(session.score(), 1100);
        assert!(session.flipped_indices().is_empty());
    }

    #[test]
    fn test_manual_evaluate_cancels_queued_evaluation() {
        let mut session = session(3);
        let (k, r) = faces_of(&session, PairId(2));

        session.flip(k);
        session.flip(r);
        let outcome = session.evaluate().unwrap();
        assert!(outcome.is_match);
        assert_eq!(session.pending_tasks(), 0);

        // Nothing left to evaluate
        assert!(session.evaluate().is_none());
        session.settle();
        assert_eq!(session.score(), 1100);
    }

    #[test]
    fn test_miss_reverts_after_delay() {
        let mut session = session(3);
        let (k1, _) = faces_of(&session, PairId(1));
        let (_, r2) = faces_of(&session, PairId(2));

        session.flip(k1);
        session.flip(r2);
        session.advance(1000);
        assert_eq!(session.score(), 980);
        assert!(session.card(k1).unwrap().is_flipped, "miss flash still visible");

        session.advance(499);
        assert!(session.card(k1).unwrap().is_flipped);
        session.advance(1);
        assert!(!session.card(k1).unwrap().is_flipped);
        assert!(!session.card(r2).unwrap().is_flipped);
    }

    #[test]
    fn test_stale_evaluation_dropped_on_new_round() {
        let mut session = session(3);
        let (k, r) = faces_of(&session, PairId(1));

        session.flip(k);
        session.flip(r);
        assert!(session.next_round());
        session.advance(5000);

        assert_eq!(session.round().number(), 2);
        assert_eq!(session.score(), 1000);
        assert_eq!(session.matched_count(), 0);
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn test_round_navigation_bounds() {
        let mut session = session(2);
        assert!(!session.previous_round());
        assert_eq!(session.generation(), 1, "no-op leaves the table alone");

        for expected in 2..=4 {
            assert!(session.next_round());
            assert_eq!(session.round().number(), expected);
        }
        assert!(!session.next_round());
        assert_eq!(session.round(), Round::LAST);
        assert!(session.previous_round());
        assert_eq!(session.round().number(), 3);
    }

    #[test]
    fn test_restrict_penalty_and_focus() {
        let mut session = session(4);
        let active = session.restrict_to_four().unwrap();

        assert_eq!(active.len(), 4);
        assert!(session.is_restricted());
        assert_eq!(session.score(), 950);
        assert_eq!(session.restrict_to_four(), Err(RestrictError::AlreadyRestricted));

        let outside = (0..8).find(|i| !active.contains(i)).unwrap();
        assert_eq!(
            session.flip(outside),
            FlipOutcome::Rejected(FlipRejection::OutsideFocus)
        );
    }

    #[test]
    fn test_restrict_needs_four_unmatched() {
        let mut session = session(2);
        let (k, r) = faces_of(&session, PairId(1));
        session.flip(k);
        session.flip(r);
        session.settle();

        assert_eq!(
            session.restrict_to_four(),
            Err(RestrictError::NotEnoughCards { remaining: 2 })
        );
        assert_eq!(session.score(), 1100);
    }

    #[test]
    fn test_exit_restriction_turns_cards_down() {
        let mut session = session(4);
        let active = session.restrict_to_four().unwrap();

        session.flip(active[0]);
        assert!(session.exit_restriction());
        assert!(!session.is_restricted());
        assert!(session.active_indices().is_empty());
        assert!(session.flipped_indices().is_empty());
        assert!(!session.card(active[0]).unwrap().is_flipped);
        assert!(!session.exit_restriction());
    }

    #[test]
    fn test_restricted_scoring() {
        let mut session = session(2);
        let log = EventLog::new();
        session.add_listener(Box::new(log.clone()));

        session.restrict_to_four().unwrap();
        let (k, r) = faces_of(&session, PairId(1));
        session.flip(k);
        session.flip(r);
        session.settle();

        // 1000 - 50 focus cost + 50 focused match
        assert_eq!(session.score(), 1000);
        assert_eq!(
            log.events(),
            vec![
                SessionEvent::ScoreChanged { delta: -50, score: 950 },
                SessionEvent::RestrictionStarted,
                SessionEvent::ScoreChanged { delta: 50, score: 1000 },
                SessionEvent::Matched(PairId(1)),
            ]
        );
    }

    #[test]
    fn test_auto_exit_when_focus_cleared() {
        let mut session = session(2);
        session.restrict_to_four().unwrap();

        for pair in [PairId(1), PairId(2)] {
            let (k, r) = faces_of(&session, pair);
            session.flip(k);
            session.flip(r);
            session.settle();
        }

        assert!(session.is_complete());
        assert!(!session.is_restricted());
    }

    #[test]
    fn test_no_auto_exit_when_disabled() {
        let config = SessionConfig::default().with_auto_exit(false);
        let mut session = GameSession::start(catalog(2), config).unwrap();
        session.restrict_to_four().unwrap();

        for pair in [PairId(1), PairId(2)] {
            let (k, r) = faces_of(&session, pair);
            session.flip(k);
            session.flip(r);
            session.settle();
        }

        assert!(session.is_restricted());
        assert!(session.is_restricted_complete());
    }

    #[test]
    fn test_end_drops_pending_work() {
        let mut session = session(3);
        session.flip(0);
        session.flip(1);
        session.end();

        assert!(!session.is_active());
        session.settle();
        assert_eq!(session.score(), 1000);
        assert_eq!(session.flip(2), FlipOutcome::Rejected(FlipRejection::Inactive));
    }

    #[test]
    fn test_resume_roundtrip() {
        let cat = catalog(3);
        let mut session = GameSession::start(Arc::clone(&cat), SessionConfig::default()).unwrap();
        let (k, r) = faces_of(&session, PairId(3));
        session.flip(k);
        session.flip(r);
        session.settle();
        let other = session.cards().iter().position(GameCard::is_face_down).unwrap();
        session.flip(other);

        let bytes = session.snapshot().to_bytes().unwrap();
        let snapshot = SessionSnapshot::from_bytes(&bytes).unwrap();
        let resumed = GameSession::resume(cat, snapshot, SessionConfig::default()).unwrap();

        assert_eq!(resumed.score(), 1100);
        assert_eq!(resumed.attempts(), 1);
        assert_eq!(resumed.matched_count(), 1);
        assert!(resumed.flipped_indices().is_empty());
        assert_eq!(resumed.cards().iter().filter(|c| c.is_flipped).count(), 2);
        assert!(resumed.generation() > session.generation());
    }

    #[test]
    fn test_end_leaves_focus() {
        let mut session = session(4);
        let log = EventLog::new();
        session.add_listener(Box::new(log.clone()));
        session.restrict_to_four().unwrap();

        session.end();
        assert!(!session.is_restricted());
        assert!(session.active_indices().is_empty());
        assert_eq!(log.events().last(), Some(&SessionEvent::RestrictionEnded));

        // Ending twice announces nothing new
        let seen = log.len();
        session.end();
        assert_eq!(log.len(), seen);
    }

    #[test]
    fn test_resume_rejects_inconsistent_matches() {
        let cat = catalog(3);
        let mut session = GameSession::start(Arc::clone(&cat), SessionConfig::default()).unwrap();
        let (k, r) = faces_of(&session, PairId(1));
        session.flip(k);
        session.flip(r);
        session.settle();

        let mut forgotten = session.snapshot();
        forgotten.matched_pair_ids.clear();
        let err = GameSession::resume(Arc::clone(&cat), forgotten, SessionConfig::default())
            .unwrap_err();
        assert!(matches!(err, SessionError::SnapshotMismatch(_)));

        let mut claimed = session.snapshot();
        claimed.matched_pair_ids.insert(PairId(2));
        let err = GameSession::resume(Arc::clone(&cat), claimed, SessionConfig::default())
            .unwrap_err();
        assert!(matches!(err, SessionError::SnapshotMismatch(_)));

        let mut half = session.snapshot();
        let (k2, _) = faces_of(&session, PairId(2));
        if let Some(card) = half.cards.get_mut(k2) {
            card.is_matched = true;
        }
        let err = GameSession::resume(cat, half, SessionConfig::default()).unwrap_err();
        assert!(matches!(err, SessionError::SnapshotMismatch(_)));
    }

    #[test]
    fn test_resume_rejects_bad_focus() {
        let cat = catalog(4);
        let mut session = GameSession::start(Arc::clone(&cat), SessionConfig::default()).unwrap();
        session.restrict_to_four().unwrap();
        let good = session.snapshot();

        let resumed = GameSession::resume(Arc::clone(&cat), good.clone(), SessionConfig::default())
            .unwrap();
        assert!(resumed.is_restricted());
        assert_eq!(resumed.active_indices(), good.active_indices.as_slice());

        let mut duplicated = good.clone();
        duplicated.active_indices = ActiveSet::from_slice(&[0, 0]);
        assert!(GameSession::resume(Arc::clone(&cat), duplicated, SessionConfig::default()).is_err());

        let mut repeated = good.clone();
        repeated.active_indices = ActiveSet::from_slice(&[0, 1, 2, 2]);
        assert!(GameSession::resume(Arc::clone(&cat), repeated, SessionConfig::default()).is_err());

        let mut stray = good;
        stray.is_restricted = false;
        assert!(GameSession::resume(cat, stray, SessionConfig::default()).is_err());
    }

    #[test]
    fn test_resume_rejects_exhausted_generation() {
        let cat = catalog(2);
        let session = GameSession::start(Arc::clone(&cat), SessionConfig::default()).unwrap();
        let mut snapshot = session.snapshot();
        snapshot.generation = u64::MAX;

        let err = GameSession::resume(cat, snapshot, SessionConfig::default()).unwrap_err();
        assert!(matches!(err, SessionError::SnapshotMismatch(_)));
    }

    #[test]
    fn test_resume_rejects_foreign_catalog() {
        let session = session(3);
        let snapshot = session.snapshot();

        let err = GameSession::resume(catalog(2), snapshot.clone(), SessionConfig::default())
            .unwrap_err();
        assert!(matches!(err, SessionError::SnapshotMismatch(_)));

        let other = Arc::new(
            CardCatalog::from_definitions((10..13).map(|i| CardDefinition::new(CardId::new(i), "x", "y")))
                .unwrap(),
        );
        let err = GameSession::resume(other, snapshot, SessionConfig::default()).unwrap_err();
        assert!(err.to_string().contains("not in the catalog"));
    }
}
