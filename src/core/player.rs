//! Seats, participants, and per-seat data storage.
//!
//! ## Seat
//!
//! Type-safe seat index supporting 2-255 seated players. Seat order is the
//! turn order and the scan order for duel detection.
//!
//! ## ParticipantId
//!
//! Caller-supplied identity string. There is no authentication: an id is
//! trusted at face value and only ever compared for equality.
//!
//! ## SeatMap
//!
//! Per-seat data storage backed by `Vec` for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::error::{EngineError, Result};

/// Seat index. The first seat is `Seat(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Seat(pub u8);

impl Seat {
    /// Create a new seat.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat after this one, wrapping around the table.
    #[must_use]
    pub fn next(self, seat_count: usize) -> Self {
        Self(((self.index() + 1) % seat_count) as u8)
    }

    /// Iterate over all seats at a table of `seat_count`.
    ///
    /// ```
    /// use word_transit::core::Seat;
    ///
    /// let seats: Vec<_> = Seat::all(3).collect();
    /// assert_eq!(seats, vec![Seat::new(0), Seat::new(1), Seat::new(2)]);
    /// ```
    pub fn all(seat_count: usize) -> impl Iterator<Item = Seat> {
        (0..seat_count as u8).map(Seat)
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Caller-supplied participant identity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use word_transit::core::{Seat, SeatMap};
///
/// let mut captured: SeatMap<u32> = SeatMap::with_value(4, 0);
/// captured[Seat::new(1)] += 3;
/// assert_eq!(captured[Seat::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(seat_count: usize, factory: impl Fn(Seat) -> T) -> Self {
        assert!(seat_count > 0, "Must have at least 1 seat");
        assert!(seat_count <= 255, "At most 255 seats supported");

        let data = (0..seat_count as u8).map(|i| factory(Seat(i))).collect();
        Self { data }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(seat_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(seat_count, |_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default(seat_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(seat_count, |_| T::default())
    }

    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over (Seat, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (Seat(i as u8), v))
    }

    /// Iterate over the values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}

/// A participant bound to a seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatedPlayer {
    pub participant: ParticipantId,
    pub name: String,
}

impl SeatedPlayer {
    pub fn new(participant: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            name: name.into(),
        }
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Seated players in seat order, fixed for the lifetime of a round.
///
/// The room collaborator guarantees one participant per seat; the roster
/// only checks that no participant is bound twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    seats: Vec<SeatedPlayer>,
}

impl Roster {
    /// Build a roster from players listed in seat order.
    pub fn new(players: Vec<SeatedPlayer>) -> Result<Self> {
        if players.len() < 2 {
            return Err(EngineError::NotEnoughPlayers {
                seated: players.len(),
            });
        }
        if players.len() > 255 {
            return Err(EngineError::Config(format!(
                "{} seats exceeds the 255 seat limit",
                players.len()
            )));
        }
        for (i, p) in players.iter().enumerate() {
            if players[..i].iter().any(|q| q.participant == p.participant) {
                return Err(EngineError::InvalidParticipant(p.participant.clone()));
            }
        }
        Ok(Self { seats: players })
    }

    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    /// Find the seat bound to a participant.
    #[must_use]
    pub fn seat_of(&self, participant: &ParticipantId) -> Option<Seat> {
        self.seats
            .iter()
            .position(|p| &p.participant == participant)
            .map(|i| Seat(i as u8))
    }

    /// Find a seat or fail with `InvalidParticipant`.
    pub fn require_seat(&self, participant: &ParticipantId) -> Result<Seat> {
        self.seat_of(participant)
            .ok_or_else(|| EngineError::InvalidParticipant(participant.clone()))
    }

    #[must_use]
    pub fn player(&self, seat: Seat) -> &SeatedPlayer {
        &self.seats[seat.index()]
    }

    #[must_use]
    pub fn participant(&self, seat: Seat) -> &ParticipantId {
        &self.seats[seat.index()].participant
    }

    pub fn seats(&self) -> impl Iterator<Item = Seat> {
        Seat::all(self.seats.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Seat, &SeatedPlayer)> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, p)| (Seat(i as u8), p))
    }
}
