//! Legal-move generation for the burrow search.
//!
//! Routing is not a search: the hallway is one cell wide and rooms are entered
//! from directly above, so a deterministic walk (descend into the home room
//! when possible, climb out of a wrong room first, otherwise slide laterally
//! with one retry in the opposite direction) either finds the unique route or
//! proves none exists. Occupancy is checked once, against the state the move
//! is generated from; single-threaded exploration keeps that sound.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::burrow::{Burrow, Category, Direction, SpaceId, SpaceKind, State, TokenId};

/// Fitness bonus per still-empty home room slot when routing a token home.
const HOME_ROOM_FITNESS: i32 = 100;
/// Fitness bonus per freed slot when vacating a room another category needs.
const VACATE_ROOM_FITNESS: i32 = 10;
/// Base fitness of a hallway stop before the distance-to-home penalty.
const HALLWAY_BASE_FITNESS: i32 = 8;

/// One atomic relocation of a single token along a concrete path.
#[derive(Debug, Clone)]
pub struct Move {
    pub token: TokenId,
    /// Spaces traversed in order; the last entry is the destination.
    pub path: SmallVec<[SpaceId; 16]>,
    /// Path length times the token's per-step energy.
    pub energy: u32,
    /// Heuristic exploration bias; never affects correctness.
    pub fitness: i32,
}

impl Move {
    fn new(burrow: &Burrow, token: TokenId, path: SmallVec<[SpaceId; 16]>, fitness: i32) -> Move {
        let energy = path.len() as u32 * burrow.token_category(token).step_energy();
        Move {
            token,
            path,
            energy,
            fitness,
        }
    }

    pub fn dest(&self) -> SpaceId {
        *self.path.last().expect("move paths are never empty")
    }

    /// Resulting state after this move, generated from its parent state.
    pub fn apply(&self, state: &State) -> State {
        state.moved(self.token, self.dest(), self.energy)
    }
}

/// A category's room may be entered only while it holds no wrong occupants.
pub fn room_enterable(burrow: &Burrow, state: &State, category: Category) -> bool {
    burrow.room(category).iter().all(|&slot| {
        state
            .occupant(slot)
            .map_or(true, |token| burrow.token_category(token) == category)
    })
}

/// Every legal move from this state, in token order with the route-to-room
/// candidate (when one exists) ahead of that token's hallway candidates.
pub fn all_moves(burrow: &Burrow, state: &State) -> Vec<Move> {
    let mut moves = Vec::new();
    for token in 0..burrow.token_count() {
        let category = burrow.token_category(token);
        let space = burrow.space(state.position_of(token));
        match space.kind {
            SpaceKind::Hallway => {
                // Hallway tokens may only finish the trip home.
                if room_enterable(burrow, state, category) {
                    moves.extend(route_to_room(burrow, state, token));
                }
            }
            SpaceKind::Room => {
                if space.room != Some(category) {
                    if room_enterable(burrow, state, category) {
                        moves.extend(route_to_room(burrow, state, token));
                    }
                    moves.extend(routes_to_hallway(burrow, state, token));
                } else if !room_enterable(burrow, state, category) {
                    // Home room, but a wrong occupant below must be let out.
                    moves.extend(routes_to_hallway(burrow, state, token));
                }
            }
            SpaceKind::Junction => {
                debug_assert!(false, "tokens never rest on junctions");
            }
        }
    }
    moves
}

fn goes_left_first(burrow: &Burrow, state: &State, token: TokenId) -> bool {
    let category = burrow.token_category(token);
    let home_x = burrow.space(burrow.room(category)[0]).x;
    let x = burrow.space(state.position_of(token)).x;
    match home_x.cmp(&x) {
        Ordering::Greater => false,
        Ordering::Less => true,
        Ordering::Equal => category.prefers_left(),
    }
}

/// The single greedy route into the token's home room, or `None` when blocked.
///
/// Callers must have checked [`room_enterable`] first.
fn route_to_room(burrow: &Burrow, state: &State, token: TokenId) -> Option<Move> {
    let category = burrow.token_category(token);
    let start = state.position_of(token);
    let mut fitness = (burrow.room(category).len() as i32 + 1) * HOME_ROOM_FITNESS;

    let go_left_first = goes_left_first(burrow, state, token);
    let mut trying_first = true;
    let mut path: SmallVec<[SpaceId; 16]> = SmallVec::new();
    let mut current = start;
    loop {
        // Above a home room slot: descend while the slot below is free.
        if let Some(down) = burrow.adjacent(current, Direction::Down) {
            if burrow.space(down).room == Some(category) {
                if state.is_free(down) {
                    fitness -= HOME_ROOM_FITNESS;
                    path.push(down);
                    current = down;
                    continue;
                }
                if burrow.space(current).room == Some(category) {
                    // Deepest free slot reached; the occupant below is settled.
                    return Some(Move::new(burrow, token, path, fitness));
                }
                // Still on the junction: the room is already full.
                return None;
            }
        } else if burrow.space(current).room == Some(category) {
            // Bottom of the home room.
            return Some(Move::new(burrow, token, path, fitness));
        }

        // Inside a wrong room: climb to the junction before walking.
        let space = burrow.space(current);
        if space.kind == SpaceKind::Room && space.room != Some(category) {
            match burrow.adjacent(current, Direction::Up) {
                Some(up) if state.is_free(up) => {
                    path.push(up);
                    current = up;
                    continue;
                }
                _ => return None,
            }
        }

        // Hallway walk toward the home column, retrying the opposite way once.
        let direction = if go_left_first == trying_first {
            Direction::Left
        } else {
            Direction::Right
        };
        match burrow.adjacent(current, direction) {
            Some(next) if state.is_free(next) => {
                path.push(next);
                current = next;
            }
            _ if trying_first => {
                trying_first = false;
                current = start;
                path.clear();
            }
            _ => return None,
        }
    }
}

/// Every admissible hallway resting position reachable from a room, each as a
/// separate candidate move with a proximity-and-vacating fitness score.
fn routes_to_hallway(burrow: &Burrow, state: &State, token: TokenId) -> Vec<Move> {
    let category = burrow.token_category(token);
    let start = state.position_of(token);
    let home_x = burrow.space(burrow.room(category)[0]).x;

    // Reward vacating: count free home slots from the top until one is taken.
    let mut vacate_bonus = 0;
    let start_space = burrow.space(start);
    if start_space.kind == SpaceKind::Room && start_space.room != Some(category) {
        for &slot in burrow.room(category) {
            if state.is_free(slot) {
                vacate_bonus += VACATE_ROOM_FITNESS;
            } else {
                break;
            }
        }
    }

    let go_left_first = goes_left_first(burrow, state, token);
    let mut trying_first = true;
    let mut moves = Vec::new();
    let mut path: SmallVec<[SpaceId; 16]> = SmallVec::new();
    let mut current = start;
    loop {
        // Climb out of the room first.
        let space = burrow.space(current);
        if space.kind == SpaceKind::Room
            && (space.room != Some(category) || !room_enterable(burrow, state, category))
        {
            match burrow.adjacent(current, Direction::Up) {
                Some(up) if state.is_free(up) => {
                    path.push(up);
                    current = up;
                    continue;
                }
                _ => return moves,
            }
        }

        let direction = if go_left_first == trying_first {
            Direction::Left
        } else {
            Direction::Right
        };
        match burrow.adjacent(current, direction) {
            Some(next) if state.is_free(next) => {
                path.push(next);
                if burrow.space(next).kind == SpaceKind::Hallway {
                    let distance = (burrow.space(next).x - home_x).abs();
                    let fitness = HALLWAY_BASE_FITNESS - distance + vacate_bonus;
                    moves.push(Move::new(burrow, token, path.clone(), fitness));
                }
                current = next;
            }
            _ if trying_first => {
                trying_first = false;
                current = start;
                path.clear();
            }
            _ => return moves,
        }
    }
}
