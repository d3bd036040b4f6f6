//! Table state and the actions that change it.
//!
//! ## Table
//!
//! Everything one round needs: the shared draw pile, each seat's face-up
//! pile and captured set, side points from steals, the active rule, the turn
//! pointer, and at most one open duel and one interrupt window.
//!
//! Every action validates first and mutates second, so a rejected action
//! leaves the table exactly as it was. None of them block; deadlines are
//! compared against the clock when read. Wrap a `Table` in one mutex per
//! room and concurrent requests serialize cleanly.
//!
//! ## PublicTable
//!
//! Serializable snapshot of what every player can see, for the polling view.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::duel::{DuelContext, DuelOutcome, Flip, TieFlip};
use super::interrupt::{CancelReport, InterruptWindow, StealRecord};
use crate::cards::{
    Card, CategoryCard, DeckBuilder, DrawPile, Language, RoleCatalog, RoleId, RuleCard,
    TopicCatalog,
};
use crate::core::{
    Clock, EngineConfig, EngineError, GameRng, ParticipantId, Result, Roster, Seat, SeatMap,
};
use crate::rules::{find_any_duel_pair, should_duel};
use crate::settlement::Settlement;

/// What a draw led to. Exactly one of these happens per draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOutcome {
    DuelOpened {
        a: ParticipantId,
        b: ParticipantId,
    },
    TurnPassed {
        next: ParticipantId,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub card: Card,
    pub outcome: DrawOutcome,
    pub cards_remaining: usize,
}

pub struct Table {
    config: EngineConfig,
    roster: Roster,
    roles: RoleCatalog,
    language: Language,
    clock: Arc<dyn Clock>,

    draw_pile: DrawPile,
    /// Face-up piles, top = back.
    piles: SeatMap<Vector<CategoryCard>>,
    captured: SeatMap<Vector<CategoryCard>>,
    steal_points: SeatMap<u32>,
    active_rule: Option<RuleCard>,
    turn: Seat,

    duel: Option<DuelContext>,
    window: Option<InterruptWindow>,
}

impl Table {
    /// Build a deck from the catalog, seat the roster, and deal one opening
    /// card per seat.
    pub fn start(
        roster: Roster,
        catalog: &TopicCatalog,
        config: EngineConfig,
        language: Language,
        rng: &GameRng,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let roles = RoleCatalog::generate(roster.seat_count());
        let deck = DeckBuilder::new(catalog.clone(), config.clone()).build(&roles, rng)?;
        let mut table = Self::with_deck(roster, deck, config, language, clock);
        table.deal_opening();
        info!(
            seats = table.roster.seat_count(),
            deck = table.draw_pile.len(),
            "round started"
        );
        Ok(table)
    }

    /// Seat a roster over a prepared pile. No cards are dealt.
    ///
    /// Used for replays and for setting up exact positions.
    pub fn with_deck(
        roster: Roster,
        deck: DrawPile,
        config: EngineConfig,
        language: Language,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let seat_count = roster.seat_count();
        Self {
            roles: RoleCatalog::generate(seat_count),
            config,
            roster,
            language,
            clock,
            draw_pile: deck,
            piles: SeatMap::with_default(seat_count),
            captured: SeatMap::with_default(seat_count),
            steal_points: SeatMap::with_value(seat_count, 0),
            active_rule: None,
            turn: Seat::new(0),
            duel: None,
            window: None,
        }
    }

    /// Deal one card to each seat in order. A rule card dealt this way
    /// becomes the active rule and that seat gets nothing.
    fn deal_opening(&mut self) {
        for seat in self.roster.seats() {
            match self.draw_pile.draw() {
                Some(Card::Rule(rule)) => self.active_rule = Some(rule),
                Some(Card::Category(card)) => self.piles[seat].push_back(card),
                None => break,
            }
        }
        if let Some((a, b)) = self.open_duel_if_any() {
            debug!(%a, %b, "duel opened by opening deal");
        }
    }

    // === Queries ===

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn roles(&self) -> &RoleCatalog {
        &self.roles
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.draw_pile.len()
    }

    /// The pile is empty; no further draws are accepted.
    #[must_use]
    pub fn is_round_over(&self) -> bool {
        self.draw_pile.is_empty()
    }

    #[must_use]
    pub fn turn_holder(&self) -> &ParticipantId {
        self.roster.participant(self.turn)
    }

    #[must_use]
    pub fn top_card(&self, seat: Seat) -> Option<&CategoryCard> {
        self.piles[seat].last()
    }

    #[must_use]
    pub fn pile(&self, seat: Seat) -> &Vector<CategoryCard> {
        &self.piles[seat]
    }

    #[must_use]
    pub fn captured(&self, seat: Seat) -> &Vector<CategoryCard> {
        &self.captured[seat]
    }

    #[must_use]
    pub fn steal_points(&self, seat: Seat) -> u32 {
        self.steal_points[seat]
    }

    #[must_use]
    pub fn active_rule(&self) -> Option<&RuleCard> {
        self.active_rule.as_ref()
    }

    #[must_use]
    pub fn duel(&self) -> Option<&DuelContext> {
        self.duel.as_ref()
    }

    #[must_use]
    pub fn interrupt_window(&self) -> Option<&InterruptWindow> {
        self.window.as_ref()
    }

    #[must_use]
    pub fn role_label(&self, role: RoleId) -> String {
        self.roles.label(role, self.language)
    }

    /// Labels of the active rule's forced pair.
    #[must_use]
    pub fn active_rule_labels(&self) -> Option<(String, String)> {
        self.active_rule.map(|rule| {
            let (a, b) = rule.forced_pair();
            (self.role_label(a), self.role_label(b))
        })
    }

    /// First seat pair whose top cards must duel right now.
    #[must_use]
    pub fn find_any_duel_pair(&self) -> Option<(Seat, Seat)> {
        let tops: Vec<Option<&CategoryCard>> = self.piles.values().map(|p| p.last()).collect();
        find_any_duel_pair(&tops, self.active_rule.as_ref())
    }

    fn open_duel_if_any(&mut self) -> Option<(Seat, Seat)> {
        let (a, b) = self.find_any_duel_pair()?;
        let seed: Vec<CategoryCard> = [a, b]
            .iter()
            .filter_map(|&s| self.top_card(s).cloned())
            .collect();
        let deadline = self.clock.now_ms() + self.config.duel_window_ms;
        self.duel = Some(DuelContext::open(a, b, seed, deadline));
        Some((a, b))
    }

    fn open_window(&mut self, drawer: Seat) {
        let deadline = self.clock.now_ms() + self.config.steal_window_ms;
        self.window = Some(InterruptWindow::open(drawer, deadline));
    }

    // === Actions ===

    /// The turn holder flips the top card of the shared pile.
    pub fn draw(&mut self, who: &ParticipantId) -> Result<DrawResult> {
        let seat = self.roster.require_seat(who)?;
        if self.duel.is_some() {
            return Err(EngineError::DuelAlreadyOpen);
        }
        if seat != self.turn {
            return Err(EngineError::NotYourTurn(who.clone()));
        }
        let card = self.draw_pile.draw().ok_or(EngineError::DeckExhausted)?;

        match &card {
            Card::Rule(rule) => {
                debug!(%who, pair = ?rule.forced_pair(), "rule card replaces active rule");
                self.active_rule = Some(*rule);
            }
            Card::Category(c) => {
                debug!(%who, role = %c.role, "category card drawn");
                self.piles[seat].push_back(c.clone());
            }
        }
        self.open_window(seat);

        let outcome = match self.open_duel_if_any() {
            Some((a, b)) => {
                let (a, b) = (
                    self.roster.participant(a).clone(),
                    self.roster.participant(b).clone(),
                );
                debug!(%a, %b, "duel opened");
                DrawOutcome::DuelOpened { a, b }
            }
            None => {
                self.turn = self.turn.next(self.roster.seat_count());
                DrawOutcome::TurnPassed {
                    next: self.turn_holder().clone(),
                }
            }
        };

        if self.draw_pile.is_empty() {
            info!("draw pile exhausted, round over");
        }

        Ok(DrawResult {
            card,
            outcome,
            cards_remaining: self.draw_pile.len(),
        })
    }

    /// Close the open duel with `loser` losing.
    ///
    /// The winner captures the reward buffer plus both current top cards
    /// (each card once). Both piles are then cleared, and the turn goes to
    /// the seat after the winner.
    pub fn settle_by_loser(&mut self, loser_id: &ParticipantId) -> Result<DuelOutcome> {
        let duel = self.duel.as_ref().ok_or(EngineError::NoDuelOpen)?;
        let loser = self
            .roster
            .seat_of(loser_id)
            .filter(|&s| duel.involves(s))
            .ok_or_else(|| EngineError::InvalidParticipant(loser_id.clone()))?;
        let winner = duel
            .opponent_of(loser)
            .ok_or_else(|| EngineError::InvalidParticipant(loser_id.clone()))?;

        let Some(duel) = self.duel.take() else {
            return Err(EngineError::NoDuelOpen);
        };
        let mut reward = duel.into_reward();
        for seat in [loser, winner] {
            if let Some(top) = self.piles[seat].last() {
                if !reward.iter().any(|c| c.id == top.id) {
                    reward.push(top.clone());
                }
            }
        }

        let discarded = [loser, winner]
            .iter()
            .flat_map(|&s| self.piles[s].iter())
            .filter(|c| !reward.iter().any(|r| r.id == c.id))
            .count();
        self.piles[loser].clear();
        self.piles[winner].clear();
        self.captured[winner].extend(reward.iter().cloned());
        self.turn = winner.next(self.roster.seat_count());

        let outcome = DuelOutcome {
            winner: self.roster.participant(winner).clone(),
            loser: loser_id.clone(),
            captured: reward,
            discarded,
        };
        info!(
            winner = %outcome.winner,
            loser = %outcome.loser,
            captured = outcome.captured.len(),
            "duel resolved"
        );
        Ok(outcome)
    }

    /// Tie: each participant flips once more from the shared pile.
    ///
    /// Rule cards met along the way take effect immediately and do not count
    /// as the flip. The duel stays open whatever the new top cards show; a
    /// loser must still be declared.
    pub fn tie_flip_each_once(&mut self) -> Result<TieFlip> {
        let duel = self.duel.as_mut().ok_or(EngineError::NoDuelOpen)?;
        let (a, b) = duel.participants();

        let mut flips = Vec::with_capacity(2);
        let mut rules_drawn = Vec::new();
        for seat in [a, b] {
            let mut flipped = None;
            while let Some(card) = self.draw_pile.draw() {
                match card {
                    Card::Rule(rule) => {
                        self.active_rule = Some(rule);
                        rules_drawn.push(rule);
                    }
                    Card::Category(card) => {
                        self.piles[seat].push_back(card.clone());
                        duel.push_reward(card.clone());
                        flipped = Some(card);
                        break;
                    }
                }
            }
            flips.push(Flip {
                participant: self.roster.participant(seat).clone(),
                card: flipped,
            });
        }
        duel.reset_deadline(self.clock.now_ms() + self.config.duel_window_ms);
        let reward_size = duel.reward().len();

        let still_matching = should_duel(
            self.piles[a].last(),
            self.piles[b].last(),
            self.active_rule.as_ref(),
        );
        debug!(reward_size, still_matching, "tie escalated");
        Ok(TieFlip {
            flips,
            rules_drawn,
            still_matching,
            reward_size,
        })
    }

    /// Take `target`'s top card while the interrupt window is open.
    ///
    /// The card is discarded and `stealer` gains one side point. The window
    /// closes on success. The duel pot is never a steal target, but a pot
    /// card taken off a pile is forfeited and no longer goes to the winner.
    pub fn steal(&mut self, target: &ParticipantId, stealer: &ParticipantId) -> Result<StealRecord> {
        let target_seat = self.roster.require_seat(target)?;
        let stealer_seat = self.roster.require_seat(stealer)?;
        if target_seat == stealer_seat {
            return Err(EngineError::InvalidParticipant(stealer.clone()));
        }
        let now = self.clock.now_ms();
        let window = self
            .window
            .as_mut()
            .filter(|w| w.is_open(now))
            .ok_or(EngineError::InterruptWindowClosed)?;
        let card = self.piles[target_seat]
            .pop_back()
            .ok_or_else(|| EngineError::EmptyPile(target.clone()))?;

        window.record_steal(target_seat, stealer_seat);
        if let Some(duel) = self.duel.as_mut() {
            if duel.forfeit(card.id) {
                debug!(card = %card.id, "stolen card forfeited from the duel pot");
            }
        }
        self.steal_points[stealer_seat] += 1;
        debug!(%target, %stealer, card = %card.id, "card stolen");
        Ok(StealRecord {
            target: target.clone(),
            stealer: stealer.clone(),
            card,
            stealer_points: self.steal_points[stealer_seat],
        })
    }

    /// Close the interrupt window without a steal ("no duel" call).
    ///
    /// Reports, but does not prevent, the case where a duel pairing exists.
    pub fn cancel_interrupt_window(&mut self) -> Result<CancelReport> {
        let now = self.clock.now_ms();
        if !self.window.as_ref().is_some_and(|w| w.is_open(now)) {
            return Err(EngineError::InterruptWindowClosed);
        }
        let missed_duel = self.find_any_duel_pair().map(|(a, b)| {
            (
                self.roster.participant(a).clone(),
                self.roster.participant(b).clone(),
            )
        });
        if let Some(window) = self.window.as_mut() {
            window.cancel();
        }
        if let Some((a, b)) = &missed_duel {
            warn!(%a, %b, "interrupt window cancelled while a duel pairing exists");
        }
        Ok(CancelReport { missed_duel })
    }

    /// Zero-sum transfers from captured-card counts.
    ///
    /// Refused while a duel is open: the pot must be awarded first.
    pub fn compute_settlement(&self) -> Result<Settlement> {
        if self.duel.is_some() {
            return Err(EngineError::DuelAlreadyOpen);
        }
        let scores: Vec<(ParticipantId, usize)> = self
            .roster
            .iter()
            .map(|(seat, p)| (p.participant.clone(), self.captured[seat].len()))
            .collect();
        let settlement = Settlement::from_scores(&scores, self.config.settlement_unit)?;
        info!(players = scores.len(), "round settled");
        Ok(settlement)
    }

    /// Snapshot of the public table at the clock's current time.
    #[must_use]
    pub fn public_view(&self) -> PublicTable {
        let now = self.clock.now_ms();
        let seats = self
            .roster
            .iter()
            .map(|(seat, p)| PublicSeat {
                participant: p.participant.clone(),
                name: p.name.clone(),
                top: self.top_card(seat).map(|c| PublicCard {
                    role: c.role,
                    role_label: self.role_label(c.role),
                    topic: c.topic(self.language).to_string(),
                }),
                pile_size: self.piles[seat].len(),
                captured: self.captured[seat].len(),
                steal_points: self.steal_points[seat],
            })
            .collect();
        PublicTable {
            cards_remaining: self.draw_pile.len(),
            language: self.language,
            active_rule: self.active_rule_labels(),
            turn_holder: self.turn_holder().clone(),
            seats,
            duel: self.duel.as_ref().map(|d| {
                let (a, b) = d.participants();
                PublicDuel {
                    a: self.roster.participant(a).clone(),
                    b: self.roster.participant(b).clone(),
                    reward_size: d.reward().len(),
                    remaining_ms: d.remaining_ms(now),
                    stale: d.is_stale(now),
                }
            }),
            steal_window_ms: self.window.as_ref().map_or(0, |w| w.remaining_ms(now)),
            round_over: self.is_round_over(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCard {
    pub role: RoleId,
    pub role_label: String,
    pub topic: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSeat {
    pub participant: ParticipantId,
    pub name: String,
    pub top: Option<PublicCard>,
    pub pile_size: usize,
    pub captured: usize,
    pub steal_points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicDuel {
    pub a: ParticipantId,
    pub b: ParticipantId,
    pub reward_size: usize,
    pub remaining_ms: u64,
    pub stale: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicTable {
    pub cards_remaining: usize,
    pub language: Language,
    pub active_rule: Option<(String, String)>,
    pub turn_holder: ParticipantId,
    pub seats: Vec<PublicSeat>,
    pub duel: Option<PublicDuel>,
    /// Time left to steal; 0 when no window is open.
    pub steal_window_ms: u64,
    pub round_over: bool,
}
