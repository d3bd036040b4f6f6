//! Per-room serialisation.
//!
//! Table actions run inside the room mutex, so racing requests against one
//! room apply one at a time and rooms never see each other's state.

use std::sync::Arc;
use std::thread;

use word_transit::cards::{Topic, TopicCatalog};
use word_transit::core::{EngineConfig, EngineError, GameRng, LobbyConfig, ManualClock, ParticipantId, Seat};
use word_transit::lobby::{InMemoryRoomStore, Lobby, Room, RoomId};

fn pid(s: &str) -> ParticipantId {
    ParticipantId::new(s)
}

fn lobby() -> Lobby {
    let catalog = TopicCatalog::new(vec![Topic::new("职业", "Job"), Topic::new("国家", "Country")])
        .unwrap();
    Lobby::new(
        InMemoryRoomStore::new(),
        LobbyConfig::default(),
        EngineConfig::default(),
        catalog,
        Arc::new(ManualClock::new(0)),
        GameRng::new(99),
    )
    .unwrap()
}

/// Open a room with `players` seated in order and start a round.
fn started_room(lobby: &Lobby, id: &str, players: &[&str]) -> Arc<Room> {
    let room_id = lobby
        .create_room(pid(players[0]), players[0], Some(id), false)
        .unwrap()
        .id()
        .clone();
    for (seat, p) in players.iter().enumerate() {
        lobby.join_room(&room_id, pid(p), p).unwrap();
        lobby.take_seat(&room_id, &pid(p), seat as u8).unwrap();
    }
    lobby.start_game(&room_id).unwrap()
}

/// Play on until seat 0 shows a card under an open window, outside a duel.
fn open_window_with_target(room: &Room) -> Option<ParticipantId> {
    room.with_table(|t| {
        while !t.is_round_over() {
            if let Some((a, _)) = t.duel().map(|d| d.participants()) {
                let loser = t.roster().participant(a).clone();
                t.settle_by_loser(&loser)?;
                continue;
            }
            let drawer = t.turn_holder().clone();
            t.draw(&drawer)?;
            let target = Seat::new(0);
            if t.duel().is_none() && !t.pile(target).is_empty() && t.interrupt_window().is_some() {
                return Ok(Some(t.roster().participant(target).clone()));
            }
        }
        Ok(None)
    })
    .unwrap()
}

#[test]
fn test_only_one_steal_wins_the_window() {
    let lobby = lobby();
    let room = started_room(&lobby, "7000", &["a", "b", "c", "d"]);
    let target = open_window_with_target(&room).expect("seat 0 shows a card before the pile runs out");

    let handles: Vec<_> = ["b", "c", "d"]
        .into_iter()
        .map(|stealer| {
            let room = Arc::clone(&room);
            let target = target.clone();
            thread::spawn(move || room.with_table(|t| t.steal(&target, &pid(stealer))))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == EngineError::InterruptWindowClosed));

    let points: u32 = room
        .with_table(|t| Ok(t.roster().seats().map(|s| t.steal_points(s)).sum()))
        .unwrap();
    assert_eq!(points, 1);
}

#[test]
fn test_rooms_are_independent() {
    let lobby = lobby();
    let rooms: Vec<_> = ["8000", "8001", "8002"]
        .iter()
        .map(|id| started_room(&lobby, id, &["x", "y"]))
        .collect();

    let handles: Vec<_> = rooms
        .iter()
        .map(|room| {
            let room = Arc::clone(room);
            thread::spawn(move || {
                let mut draws = 0;
                loop {
                    let step = room.with_table(|t| {
                        if let Some((a, _)) = t.duel().map(|d| d.participants()) {
                            let loser = t.roster().participant(a).clone();
                            t.settle_by_loser(&loser)?;
                            return Ok(true);
                        }
                        let drawer = t.turn_holder().clone();
                        match t.draw(&drawer) {
                            Ok(_) => Ok(true),
                            Err(EngineError::DeckExhausted) => Ok(false),
                            Err(e) => Err(e),
                        }
                    });
                    match step {
                        Ok(true) => draws += 1,
                        Ok(false) => break,
                        Err(e) => panic!("unexpected {e}"),
                    }
                }
                draws
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap() > 0);
    }

    for room in &rooms {
        let left = room.with_table(|t| Ok(t.cards_remaining())).unwrap();
        assert_eq!(left, 0);
        let settlement = room.with_table(|t| t.compute_settlement()).unwrap();
        assert_eq!(settlement.sum(), 0);
    }
    assert_eq!(lobby.list_rooms().len(), 3);
    assert!(lobby.room(&RoomId("8001".into())).is_ok());
}
