//! Exhaustive route enumeration through a cave network.
//!
//! Caves are interned by name into dense ids. Large caves (uppercase names)
//! may be revisited freely; small caves at most once, or once more for a
//! single small cave when the revisit allowance is on. The enumeration is an
//! explicit-stack depth-first walk that records every completed route and
//! every dead end, so callers can inspect abandoned prefixes as well as the
//! count of distinct routes.

use std::fmt;

/// Dense index of a cave within its [`CaveSystem`].
pub type CaveId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaveKind {
    /// Entry cave; never re-entered.
    Start,
    /// Exit cave; entering it completes the route.
    End,
    /// Lowercase name; limited visits.
    Small,
    /// Uppercase name; unlimited visits.
    Large,
}

/// Failure while parsing a cave edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A line that is not exactly `name-name`.
    MalformedEdge { line: usize, text: String },
    MissingStart,
    MissingEnd,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedEdge { line, text } => {
                write!(f, "line {line} is not a 'name-name' edge: {text:?}")
            }
            Self::MissingStart => write!(f, "no cave named 'start'"),
            Self::MissingEnd => write!(f, "no cave named 'end'"),
        }
    }
}

impl std::error::Error for ParseError {}

/// One walk through the caves, complete or abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub caves: Vec<CaveId>,
    pub reached_end: bool,
}

/// Every route the enumeration produced.
#[derive(Debug, Clone)]
pub struct RouteSet {
    /// Routes that reached the end cave, in discovery order.
    pub completed: Vec<Route>,
    /// Prefixes abandoned with no admissible next cave.
    pub dead_ends: Vec<Route>,
}

/// An undirected cave network with interned names.
#[derive(Debug, Clone)]
pub struct CaveSystem {
    names: Vec<String>,
    kinds: Vec<CaveKind>,
    connections: Vec<Vec<CaveId>>,
    start: CaveId,
    end: CaveId,
}

impl CaveSystem {
    /// Parse `name-name` edge lines into a cave network.
    pub fn parse(lines: &[&str]) -> Result<CaveSystem, ParseError> {
        let mut names: Vec<String> = Vec::new();
        let mut kinds: Vec<CaveKind> = Vec::new();
        let mut connections: Vec<Vec<CaveId>> = Vec::new();

        fn intern(
            name: &str,
            names: &mut Vec<String>,
            kinds: &mut Vec<CaveKind>,
            connections: &mut Vec<Vec<CaveId>>,
        ) -> CaveId {
            if let Some(id) = names.iter().position(|n| n == name) {
                return id;
            }
            names.push(name.to_string());
            kinds.push(classify(name));
            connections.push(Vec::new());
            names.len() - 1
        }

        for (line, text) in lines.iter().enumerate() {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let (left, right) = text
                .split_once('-')
                .filter(|(l, r)| !l.is_empty() && !r.is_empty() && !r.contains('-'))
                .ok_or_else(|| ParseError::MalformedEdge {
                    line,
                    text: text.to_string(),
                })?;
            let a = intern(left, &mut names, &mut kinds, &mut connections);
            let b = intern(right, &mut names, &mut kinds, &mut connections);
            connections[a].push(b);
            connections[b].push(a);
        }

        let start = kinds
            .iter()
            .position(|&k| k == CaveKind::Start)
            .ok_or(ParseError::MissingStart)?;
        let end = kinds
            .iter()
            .position(|&k| k == CaveKind::End)
            .ok_or(ParseError::MissingEnd)?;

        Ok(CaveSystem {
            names,
            kinds,
            connections,
            start,
            end,
        })
    }

    pub fn cave_count(&self) -> usize {
        self.names.len()
    }

    pub fn name(&self, cave: CaveId) -> &str {
        &self.names[cave]
    }

    pub fn kind(&self, cave: CaveId) -> CaveKind {
        self.kinds[cave]
    }

    pub fn connections(&self, cave: CaveId) -> &[CaveId] {
        &self.connections[cave]
    }

    /// Render a route as its dash-joined cave names.
    pub fn route_string(&self, route: &Route) -> String {
        route
            .caves
            .iter()
            .map(|&cave| self.names[cave].as_str())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Enumerate every distinct route from start to end, depth first.
    ///
    /// With `allow_one_small_revisit`, a single small cave per route may be
    /// entered twice; all other small caves stay single-visit.
    pub fn enumerate_routes(&self, allow_one_small_revisit: bool) -> RouteSet {
        let mut completed = Vec::new();
        let mut dead_ends = Vec::new();
        let mut pending: Vec<Vec<CaveId>> = vec![vec![self.start]];

        while let Some(route) = pending.pop() {
            let current = *route.last().unwrap();
            if current == self.end {
                completed.push(Route {
                    caves: route,
                    reached_end: true,
                });
                continue;
            }

            let nexts: Vec<CaveId> = self.connections[current]
                .iter()
                .copied()
                .filter(|&next| self.can_visit(&route, next, allow_one_small_revisit))
                .collect();

            if nexts.is_empty() {
                dead_ends.push(Route {
                    caves: route,
                    reached_end: false,
                });
                continue;
            }

            // Reversed so the first connection is explored first.
            for &next in nexts.iter().rev() {
                let mut extended = route.clone();
                extended.push(next);
                pending.push(extended);
            }
        }

        RouteSet {
            completed,
            dead_ends,
        }
    }

    fn can_visit(&self, route: &[CaveId], next: CaveId, allow_one_small_revisit: bool) -> bool {
        match self.kinds[next] {
            CaveKind::Start => false,
            CaveKind::End | CaveKind::Large => true,
            CaveKind::Small => {
                let visits = route.iter().filter(|&&cave| cave == next).count();
                match visits {
                    0 => true,
                    1 if allow_one_small_revisit => !self.revisit_spent(route),
                    _ => false,
                }
            }
        }
    }

    /// Whether some small cave already appears twice in the route.
    fn revisit_spent(&self, route: &[CaveId]) -> bool {
        route
            .iter()
            .filter(|&&cave| self.kinds[cave] == CaveKind::Small)
            .any(|&cave| route.iter().filter(|&&c| c == cave).count() >= 2)
    }
}

fn classify(name: &str) -> CaveKind {
    match name {
        "start" => CaveKind::Start,
        "end" => CaveKind::End,
        _ if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) => CaveKind::Large,
        _ => CaveKind::Small,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_EXAMPLE: [&str; 7] = [
        "start-A", "start-b", "A-c", "A-b", "b-d", "A-end", "b-end",
    ];

    const LARGER_EXAMPLE: [&str; 10] = [
        "dc-end", "HN-start", "start-kj", "dc-start", "dc-HN", "LN-dc", "HN-end", "kj-sa",
        "kj-HN", "kj-dc",
    ];

    #[test]
    fn parse_interns_and_classifies_caves() {
        let caves = CaveSystem::parse(&SMALL_EXAMPLE).unwrap();
        assert_eq!(caves.cave_count(), 6);
        let a = caves
            .connections(0)
            .iter()
            .copied()
            .find(|&c| caves.name(c) == "A")
            .unwrap();
        assert_eq!(caves.kind(a), CaveKind::Large);
        let b = (0..caves.cave_count())
            .find(|&c| caves.name(c) == "b")
            .unwrap();
        assert_eq!(caves.kind(b), CaveKind::Small);
    }

    #[test]
    fn edges_connect_both_ways() {
        let caves = CaveSystem::parse(&SMALL_EXAMPLE).unwrap();
        for cave in 0..caves.cave_count() {
            for &other in caves.connections(cave) {
                assert!(
                    caves.connections(other).contains(&cave),
                    "{} -> {} has no reverse edge",
                    caves.name(cave),
                    caves.name(other)
                );
            }
        }
    }

    #[test]
    fn small_example_has_10_routes() {
        let caves = CaveSystem::parse(&SMALL_EXAMPLE).unwrap();
        let routes = caves.enumerate_routes(false);
        assert_eq!(routes.completed.len(), 10);
    }

    #[test]
    fn small_example_allows_36_routes_with_a_revisit() {
        let caves = CaveSystem::parse(&SMALL_EXAMPLE).unwrap();
        let routes = caves.enumerate_routes(true);
        assert_eq!(routes.completed.len(), 36);
    }

    #[test]
    fn larger_example_has_19_and_103_routes() {
        let caves = CaveSystem::parse(&LARGER_EXAMPLE).unwrap();
        assert_eq!(caves.enumerate_routes(false).completed.len(), 19);
        assert_eq!(caves.enumerate_routes(true).completed.len(), 103);
    }

    #[test]
    fn completed_routes_run_start_to_end_without_repeats() {
        let caves = CaveSystem::parse(&SMALL_EXAMPLE).unwrap();
        let routes = caves.enumerate_routes(false);
        let mut seen = Vec::new();
        for route in &routes.completed {
            assert!(route.reached_end);
            assert_eq!(caves.kind(route.caves[0]), CaveKind::Start);
            assert_eq!(caves.kind(*route.caves.last().unwrap()), CaveKind::End);
            let starts = route
                .caves
                .iter()
                .filter(|&&c| caves.kind(c) == CaveKind::Start)
                .count();
            assert_eq!(starts, 1);
            let rendered = caves.route_string(route);
            assert!(!seen.contains(&rendered), "duplicate route {rendered}");
            seen.push(rendered);
        }
    }

    #[test]
    fn dead_ends_stop_short_of_the_end() {
        let caves = CaveSystem::parse(&SMALL_EXAMPLE).unwrap();
        let routes = caves.enumerate_routes(false);
        // start-b-d and start-A-b-d both strand in d.
        assert!(!routes.dead_ends.is_empty());
        for route in &routes.dead_ends {
            assert!(!route.reached_end);
            assert_ne!(caves.kind(*route.caves.last().unwrap()), CaveKind::End);
        }
        let strings: Vec<String> = routes
            .dead_ends
            .iter()
            .map(|r| caves.route_string(r))
            .collect();
        assert!(strings.contains(&"start-b-d".to_string()));
    }

    #[test]
    fn revisit_allowance_covers_only_one_small_cave() {
        let caves = CaveSystem::parse(&SMALL_EXAMPLE).unwrap();
        let routes = caves.enumerate_routes(true);
        for route in &routes.completed {
            let doubled = route
                .caves
                .iter()
                .filter(|&&c| caves.kind(c) == CaveKind::Small)
                .filter(|&&c| route.caves.iter().filter(|&&o| o == c).count() >= 2)
                .copied()
                .collect::<Vec<_>>();
            let mut distinct = doubled.clone();
            distinct.sort_unstable();
            distinct.dedup();
            assert!(distinct.len() <= 1, "route revisits more than one small cave");
        }
    }

    #[test]
    fn parse_rejects_malformed_edges() {
        assert_eq!(
            CaveSystem::parse(&["start-A", "Aend"]).unwrap_err(),
            ParseError::MalformedEdge {
                line: 1,
                text: "Aend".to_string()
            }
        );
        assert!(CaveSystem::parse(&["start-A-end"]).is_err());
    }

    #[test]
    fn parse_requires_start_and_end() {
        assert_eq!(
            CaveSystem::parse(&["a-b"]).unwrap_err(),
            ParseError::MissingStart
        );
        assert_eq!(
            CaveSystem::parse(&["start-b"]).unwrap_err(),
            ParseError::MissingEnd
        );
    }
}
