//! Burrow topology and placement state for the token-sorting puzzle.
//!
//! The burrow is parsed once from an ASCII diagram into an immutable graph of
//! spaces (hallway cells, junctions above each room, and room slots). Dynamic
//! occupancy lives entirely in [`State`] snapshots so that forked search
//! branches never share mutable position data.

use std::fmt;

use smallvec::SmallVec;

/// Index of a space within a [`Burrow`].
pub type SpaceId = usize;

/// Index of a token within a [`Burrow`].
pub type TokenId = usize;

/// Upper bound on tokens for the unfolded (4-deep) configuration.
pub const MAX_TOKENS: usize = 16;

/// Compact placement key: one space id per token, in token order.
pub type Placement = SmallVec<[u8; MAX_TOKENS]>;

/// Token category. Determines per-step energy cost and the home room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Amber,
    Bronze,
    Copper,
    Desert,
}

impl Category {
    pub fn from_char(c: char) -> Option<Category> {
        match c {
            'A' => Some(Category::Amber),
            'B' => Some(Category::Bronze),
            'C' => Some(Category::Copper),
            'D' => Some(Category::Desert),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Category::Amber => 'A',
            Category::Bronze => 'B',
            Category::Copper => 'C',
            Category::Desert => 'D',
        }
    }

    /// Energy spent per single step of movement.
    pub fn step_energy(self) -> u32 {
        match self {
            Category::Amber => 1,
            Category::Bronze => 10,
            Category::Copper => 100,
            Category::Desert => 1000,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lateral preference when a token sits level with its home column.
    /// Amber/Bronze try left first, Copper/Desert try right first.
    pub fn prefers_left(self) -> bool {
        matches!(self, Category::Amber | Category::Bronze)
    }
}

/// What a space is, which governs where tokens may rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceKind {
    /// Open hallway cell; a legal resting position.
    Hallway,
    /// Hallway cell directly above a room; tokens pass through but never stop.
    Junction,
    /// Capacity-one room slot with a required occupant category.
    Room,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// One location in the burrow. Adjacency and kind are fixed at construction.
#[derive(Debug, Clone)]
pub struct Space {
    pub kind: SpaceKind,
    /// Required occupant category, for room slots.
    pub room: Option<Category>,
    /// Diagram column.
    pub x: i32,
    /// Diagram row.
    pub y: i32,
    up: Option<SpaceId>,
    down: Option<SpaceId>,
    left: Option<SpaceId>,
    right: Option<SpaceId>,
}

impl Space {
    fn new(kind: SpaceKind, room: Option<Category>, x: i32, y: i32) -> Self {
        Self {
            kind,
            room,
            x,
            y,
            up: None,
            down: None,
            left: None,
            right: None,
        }
    }

    pub fn adjacent(&self, direction: Direction) -> Option<SpaceId> {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Failure while parsing a burrow diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Diagram too short to hold a hallway and at least one room row.
    TooFewLines { found: usize },
    /// No open hallway cells on the second diagram line.
    MissingHallway,
    /// A room letter other than A-D.
    InvalidCategory { found: char, line: usize },
    /// A room row whose letter columns differ from the first room row.
    MisalignedRooms { line: usize },
    /// Diagrams must have exactly four room columns.
    RoomColumnCount { found: usize },
    /// The hallway cell above a room column is not open.
    BlockedJunction { column: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLines { found } => {
                write!(f, "burrow diagram needs at least 5 lines, found {found}")
            }
            Self::MissingHallway => write!(f, "no open hallway cells on diagram line 2"),
            Self::InvalidCategory { found, line } => {
                write!(f, "invalid token category '{found}' on line {line}")
            }
            Self::MisalignedRooms { line } => {
                write!(f, "room row on line {line} does not match the first room row")
            }
            Self::RoomColumnCount { found } => {
                write!(f, "expected 4 room columns, found {found}")
            }
            Self::BlockedJunction { column } => {
                write!(f, "hallway is not open above the room at column {column}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// The immutable burrow graph plus the starting token layout.
#[derive(Debug, Clone)]
pub struct Burrow {
    spaces: Vec<Space>,
    /// Room slots per category, ordered top-down.
    rooms: [SmallVec<[SpaceId; 4]>; 4],
    /// Token categories in diagram reading order.
    tokens: Vec<Category>,
    /// Starting space per token.
    starts: Vec<SpaceId>,
}

impl Burrow {
    /// Parse the standard diagram:
    ///
    /// ```text
    /// #############
    /// #...........#
    /// ###B#C#B#D###
    ///   #A#D#C#A#
    ///   #########
    /// ```
    pub fn parse(lines: &[&str]) -> Result<Burrow, ParseError> {
        if lines.len() < 5 {
            return Err(ParseError::TooFewLines { found: lines.len() });
        }

        let hallway_columns: Vec<usize> = lines[1]
            .char_indices()
            .filter(|&(_, c)| c == '.')
            .map(|(col, _)| col)
            .collect();
        if hallway_columns.is_empty() {
            return Err(ParseError::MissingHallway);
        }

        // Room rows are the interior lines carrying category letters.
        let mut room_rows: Vec<(usize, Vec<(usize, Category)>)> = Vec::new();
        for (offset, line) in lines[2..].iter().enumerate() {
            let line_index = offset + 2;
            let mut cells = Vec::new();
            for (col, c) in line.char_indices() {
                if c.is_ascii_alphabetic() {
                    let category = Category::from_char(c).ok_or(ParseError::InvalidCategory {
                        found: c,
                        line: line_index + 1,
                    })?;
                    cells.push((col, category));
                }
            }
            if !cells.is_empty() {
                room_rows.push((line_index, cells));
            }
        }

        let room_columns: Vec<usize> = match room_rows.first() {
            Some((_, cells)) => cells.iter().map(|&(col, _)| col).collect(),
            None => Vec::new(),
        };
        if room_columns.len() != 4 {
            return Err(ParseError::RoomColumnCount {
                found: room_columns.len(),
            });
        }
        for (line_index, cells) in &room_rows {
            let columns: Vec<usize> = cells.iter().map(|&(col, _)| col).collect();
            if columns != room_columns {
                return Err(ParseError::MisalignedRooms {
                    line: line_index + 1,
                });
            }
        }
        for &column in &room_columns {
            if !hallway_columns.contains(&column) {
                return Err(ParseError::BlockedJunction { column });
            }
        }

        // Hallway row, junctions flagged where a room sits below.
        let mut spaces = Vec::new();
        let mut id_at = std::collections::HashMap::new();
        for &col in &hallway_columns {
            let kind = if room_columns.contains(&col) {
                SpaceKind::Junction
            } else {
                SpaceKind::Hallway
            };
            id_at.insert((col, 1usize), spaces.len());
            spaces.push(Space::new(kind, None, col as i32, 1));
        }

        // Room slots, top-down per column; also the token start layout.
        let room_categories = [
            Category::Amber,
            Category::Bronze,
            Category::Copper,
            Category::Desert,
        ];
        let mut rooms: [SmallVec<[SpaceId; 4]>; 4] = Default::default();
        let mut tokens = Vec::new();
        let mut starts = Vec::new();
        for (line_index, cells) in &room_rows {
            for (slot, &(col, occupant)) in cells.iter().enumerate() {
                let id = spaces.len();
                id_at.insert((col, *line_index), id);
                spaces.push(Space::new(
                    SpaceKind::Room,
                    Some(room_categories[slot]),
                    col as i32,
                    *line_index as i32,
                ));
                rooms[slot].push(id);
                tokens.push(occupant);
                starts.push(id);
            }
        }

        // Wire up symmetric adjacency.
        for window in hallway_columns.windows(2) {
            if window[1] == window[0] + 1 {
                let a = id_at[&(window[0], 1)];
                let b = id_at[&(window[1], 1)];
                spaces[a].right = Some(b);
                spaces[b].left = Some(a);
            }
        }
        for &col in &room_columns {
            let mut above = id_at[&(col, 1)];
            for (line_index, _) in &room_rows {
                let below = id_at[&(col, *line_index)];
                spaces[above].down = Some(below);
                spaces[below].up = Some(above);
                above = below;
            }
        }

        Ok(Burrow {
            spaces,
            rooms,
            tokens,
            starts,
        })
    }

    /// Parse the diagram with the two folded-out rows (`D C B A` / `D B A C`)
    /// inserted between the starting rows, yielding the 4-deep configuration.
    pub fn parse_unfolded(lines: &[&str]) -> Result<Burrow, ParseError> {
        if lines.len() < 5 {
            return Err(ParseError::TooFewLines { found: lines.len() });
        }
        let columns: Vec<usize> = lines[2]
            .char_indices()
            .filter(|(_, c)| c.is_ascii_alphabetic())
            .map(|(col, _)| col)
            .collect();
        if columns.len() != 4 {
            return Err(ParseError::RoomColumnCount {
                found: columns.len(),
            });
        }

        let inserted_rows = [['D', 'C', 'B', 'A'], ['D', 'B', 'A', 'C']];
        let mut expanded: Vec<String> = lines[..3].iter().map(|s| (*s).to_string()).collect();
        for letters in inserted_rows {
            let width = columns[3] + 2;
            let mut row = vec![' '; width];
            for (slot, &col) in columns.iter().enumerate() {
                if col > 0 {
                    row[col - 1] = '#';
                }
                row[col] = letters[slot];
                row[col + 1] = '#';
            }
            expanded.push(row.into_iter().collect());
        }
        expanded.extend(lines[3..].iter().map(|s| (*s).to_string()));

        let refs: Vec<&str> = expanded.iter().map(String::as_str).collect();
        Self::parse(&refs)
    }

    pub fn space(&self, id: SpaceId) -> &Space {
        &self.spaces[id]
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn adjacent(&self, id: SpaceId, direction: Direction) -> Option<SpaceId> {
        self.spaces[id].adjacent(direction)
    }

    /// Look up a space by diagram coordinates.
    pub fn space_at(&self, x: i32, y: i32) -> Option<SpaceId> {
        self.spaces.iter().position(|s| s.x == x && s.y == y)
    }

    /// Room slots for a category, ordered top-down.
    pub fn room(&self, category: Category) -> &[SpaceId] {
        &self.rooms[category.index()]
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn token_category(&self, token: TokenId) -> Category {
        self.tokens[token]
    }

    /// State with every token on its starting space and zero energy spent.
    pub fn initial_state(&self) -> State {
        State::new(self.starts.iter().copied(), 0)
    }
}

/// An immutable snapshot of token placements plus the energy spent to reach it.
///
/// States are produced by [`State::moved`] and never mutated; two states are
/// equal when every token occupies the same space and the energy matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    positions: Placement,
    pub energy_used: u32,
}

impl State {
    pub fn new(positions: impl IntoIterator<Item = SpaceId>, energy_used: u32) -> State {
        let positions: Placement = positions.into_iter().map(|id| id as u8).collect();
        debug_assert!(positions.len() <= MAX_TOKENS);
        State {
            positions,
            energy_used,
        }
    }

    pub fn token_count(&self) -> usize {
        self.positions.len()
    }

    pub fn position_of(&self, token: TokenId) -> SpaceId {
        self.positions[token] as SpaceId
    }

    /// The token currently resting on a space, if any.
    pub fn occupant(&self, space: SpaceId) -> Option<TokenId> {
        self.positions.iter().position(|&p| p as SpaceId == space)
    }

    pub fn is_free(&self, space: SpaceId) -> bool {
        self.occupant(space).is_none()
    }

    /// The placement key used by the dedup index (positions only, no energy).
    pub fn placement(&self) -> Placement {
        self.positions.clone()
    }

    /// Successor state with one token relocated and the move's energy added.
    pub fn moved(&self, token: TokenId, dest: SpaceId, energy_cost: u32) -> State {
        let mut positions = self.positions.clone();
        positions[token] = dest as u8;
        debug_assert!(
            !self.positions.iter().any(|&p| p as SpaceId == dest),
            "destination space already occupied"
        );
        State {
            positions,
            energy_used: self.energy_used + energy_cost,
        }
    }

    /// Goal test: every token rests in a room slot of its own category.
    pub fn is_goal(&self, burrow: &Burrow) -> bool {
        (0..self.token_count()).all(|token| {
            burrow.space(self.position_of(token)).room == Some(burrow.token_category(token))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [&str; 5] = [
        "#############",
        "#...........#",
        "###B#C#B#D###",
        "  #A#D#C#A#",
        "  #########",
    ];

    const SOLVED: [&str; 5] = [
        "#############",
        "#...........#",
        "###A#B#C#D###",
        "  #A#B#C#D#",
        "  #########",
    ];

    #[test]
    fn parse_sample_counts() {
        let burrow = Burrow::parse(&SAMPLE).unwrap();
        // 11 hallway cells (4 of them junctions) + 8 room slots.
        assert_eq!(burrow.spaces().len(), 19);
        assert_eq!(burrow.token_count(), 8);
        let junctions = burrow
            .spaces()
            .iter()
            .filter(|s| s.kind == SpaceKind::Junction)
            .count();
        assert_eq!(junctions, 4);
        for category in [
            Category::Amber,
            Category::Bronze,
            Category::Copper,
            Category::Desert,
        ] {
            assert_eq!(burrow.room(category).len(), 2);
        }
    }

    #[test]
    fn adjacency_is_symmetric() {
        let burrow = Burrow::parse(&SAMPLE).unwrap();
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        for id in 0..burrow.spaces().len() {
            for direction in directions {
                if let Some(other) = burrow.adjacent(id, direction) {
                    assert_eq!(
                        burrow.adjacent(other, direction.opposite()),
                        Some(id),
                        "asymmetric link {id} -> {other}"
                    );
                }
            }
        }
    }

    #[test]
    fn junctions_sit_above_room_tops() {
        let burrow = Burrow::parse(&SAMPLE).unwrap();
        for category in [
            Category::Amber,
            Category::Bronze,
            Category::Copper,
            Category::Desert,
        ] {
            let top = burrow.room(category)[0];
            let junction = burrow.adjacent(top, Direction::Up).unwrap();
            assert_eq!(burrow.space(junction).kind, SpaceKind::Junction);
            assert_eq!(burrow.space(junction).x, burrow.space(top).x);
        }
    }

    #[test]
    fn initial_state_is_consistent() {
        let burrow = Burrow::parse(&SAMPLE).unwrap();
        let state = burrow.initial_state();
        assert_eq!(state.energy_used, 0);
        for token in 0..burrow.token_count() {
            assert_eq!(state.occupant(state.position_of(token)), Some(token));
        }
    }

    #[test]
    fn sample_is_not_goal_but_solved_is() {
        let burrow = Burrow::parse(&SAMPLE).unwrap();
        assert!(!burrow.initial_state().is_goal(&burrow));

        let solved = Burrow::parse(&SOLVED).unwrap();
        assert!(solved.initial_state().is_goal(&solved));
    }

    #[test]
    fn parse_rejects_bad_category() {
        let lines = [
            "#############",
            "#...........#",
            "###B#C#X#D###",
            "  #A#D#C#A#",
            "  #########",
        ];
        assert_eq!(
            Burrow::parse(&lines).unwrap_err(),
            ParseError::InvalidCategory {
                found: 'X',
                line: 3
            }
        );
    }

    #[test]
    fn parse_rejects_misaligned_rooms() {
        let lines = [
            "#############",
            "#...........#",
            "###B#C#B#D###",
            "   #A#D#C#A#",
            "  #########",
        ];
        assert!(matches!(
            Burrow::parse(&lines),
            Err(ParseError::MisalignedRooms { .. })
        ));
    }

    #[test]
    fn parse_rejects_short_input() {
        assert_eq!(
            Burrow::parse(&["#####", "#...#"]).unwrap_err(),
            ParseError::TooFewLines { found: 2 }
        );
    }

    #[test]
    fn unfolded_sample_has_four_deep_rooms() {
        let burrow = Burrow::parse_unfolded(&SAMPLE).unwrap();
        assert_eq!(burrow.token_count(), 16);
        for category in [
            Category::Amber,
            Category::Bronze,
            Category::Copper,
            Category::Desert,
        ] {
            assert_eq!(burrow.room(category).len(), 4);
        }
        // The inserted rows put D/C/B/A then D/B/A/C across the columns.
        let desert_room = burrow.room(Category::Desert);
        let second_row_token = burrow.initial_state().occupant(desert_room[1]).unwrap();
        assert_eq!(burrow.token_category(second_row_token), Category::Amber);
    }

    #[test]
    fn moved_produces_new_snapshot() {
        let burrow = Burrow::parse(&SAMPLE).unwrap();
        let state = burrow.initial_state();
        let hallway = burrow.space_at(1, 1).unwrap();
        let next = state.moved(0, hallway, 30);
        assert_eq!(next.position_of(0), hallway);
        assert_eq!(next.energy_used, 30);
        // Parent snapshot unchanged.
        assert_ne!(state.position_of(0), hallway);
        assert_eq!(state.energy_used, 0);
    }
}
