use core::fmt;
use core::time::Duration;
use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    /// Every safe cell was opened.
    Won,
    /// A mine was opened.
    Lost,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One playthrough on a mined field.
///
/// The field is fixed for the whole session, only the set of opened cells grows. The stopwatch runs from the first
/// reveal until the game is won or lost.
#[derive(Clone, Debug)]
pub struct GameSession {
    minefield: Minefield,
    opened: Array2<bool>,
    opened_count: CellCount,
    state: SessionState,
    stopwatch: Stopwatch,
}

impl GameSession {
    /// Generates a randomly mined field for `config`, seeded from `config.seed` when set.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_generator(config, RandomMinefieldGenerator::from_config(&config))
    }

    pub fn with_generator<G: MinefieldGenerator>(config: GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        generator.generate(config).map(Self::from_minefield)
    }

    pub fn from_minefield(minefield: Minefield) -> Self {
        let size = minefield.size();
        log::debug!(
            "New session on {:?} field with {} mines",
            size,
            minefield.mine_count()
        );
        Self {
            minefield,
            opened: Array2::default(size.grid_index()),
            opened_count: 0,
            state: SessionState::default(),
            stopwatch: Stopwatch::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_won(&self) -> bool {
        matches!(self.state, SessionState::Won)
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.state, SessionState::Lost)
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running)
    }

    /// Out of bounds coordinates are never opened.
    pub fn is_cell_opened(&self, coords: Coord2) -> bool {
        self.opened
            .get(coords.grid_index())
            .copied()
            .unwrap_or(false)
    }

    pub fn opened_count(&self) -> CellCount {
        self.opened_count
    }

    pub fn minefield(&self) -> &Minefield {
        &self.minefield
    }

    pub fn elapsed_time(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    /// Opens the cell at `coords` and, if it has no surrounding mines, the whole connected region of such cells along
    /// with its border.
    ///
    /// Returns only the cells opened by this call.
    pub fn reveal(&mut self, coords: Coord2) -> Result<BTreeSet<Coord2>> {
        let coords = self.minefield.validate_coords(coords)?;
        self.check_not_finished()?;
        if self.opened[coords.grid_index()] {
            return Err(GameError::AlreadyOpened(coords));
        }

        self.mark_started();
        let newly_opened = self.flood_open(coords);
        log::debug!("Reveal at {:?} opened {} cells", coords, newly_opened.len());

        if self.minefield[coords].is_mine() {
            self.end_game(SessionState::Lost)?;
        } else if self.opened_count + self.minefield.mine_count() == self.minefield.total_cells() {
            self.end_game(SessionState::Won)?;
        }

        Ok(newly_opened)
    }

    fn flood_open(&mut self, start: Coord2) -> BTreeSet<Coord2> {
        let mut newly_opened = BTreeSet::new();
        let mut to_visit = vec![start];

        while let Some(visit_coords) = to_visit.pop() {
            let opened = &mut self.opened[visit_coords.grid_index()];
            if *opened {
                continue;
            }
            *opened = true;
            self.opened_count += 1;
            newly_opened.insert(visit_coords);

            let cell = self.minefield[visit_coords];
            log::trace!("Opened cell at {:?}: {:?}", visit_coords, cell);

            // mines and numbered cells stop the fill
            if cell.is_empty() {
                to_visit.extend(
                    self.minefield
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| !self.opened[pos.grid_index()]),
                );
            }
        }

        newly_opened
    }

    fn mark_started(&mut self) {
        if matches!(self.state, SessionState::NotStarted) {
            self.state = SessionState::Running;
            self.stopwatch.start();
            log::debug!("Session started");
        }
    }

    fn end_game(&mut self, outcome: SessionState) -> Result<()> {
        self.stopwatch.stop()?;
        self.state = outcome;
        log::debug!(
            "Session ended {:?} after {:?}",
            outcome,
            self.stopwatch.elapsed()
        );
        Ok(())
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.minefield.size();
        for y in 0..height {
            if y > 0 {
                f.write_str("\n")?;
            }
            for x in 0..width {
                if self.is_cell_opened((x, y)) {
                    write!(f, "{}", self.minefield[(x, y)])?;
                } else {
                    f.write_str("#")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread::sleep;

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        GameSession::from_minefield(Minefield::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn fresh_session_is_not_started() {
        let session = session((3, 3), &[(0, 0)]);

        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(!session.is_ended());
        assert!(!session.is_won());
        assert!(!session.is_lost());
        assert!(!session.is_running());
        assert_eq!(session.elapsed_time(), Duration::ZERO);
        assert_eq!(session.to_string(), "###\n###\n###");
    }

    #[test]
    fn single_reveal_clears_whole_field() {
        let mut session = session((3, 3), &[(0, 0)]);

        let opened = session.reveal((2, 2)).unwrap();

        assert_eq!(opened.len(), 8);
        assert!(!opened.contains(&(0, 0)));
        assert_eq!(session.state(), SessionState::Won);
        assert!(session.is_ended());
        assert!(!session.is_running());
        assert!(!session.is_lost());
        assert_eq!(session.to_string(), "#1.\n11.\n...");
    }

    #[test]
    fn numbered_cells_do_not_propagate() {
        let mut session = session((3, 3), &[(0, 0)]);

        assert_eq!(session.reveal((1, 0)).unwrap(), BTreeSet::from([(1, 0)]));
        assert!(session.is_running());
        assert_eq!(session.to_string(), "#1#\n###\n###");

        assert_eq!(session.reveal((0, 1)).unwrap(), BTreeSet::from([(0, 1)]));
        assert!(session.is_running());

        sleep(Duration::from_millis(10));

        let opened = session.reveal((2, 2)).unwrap();
        assert_eq!(opened.len(), 6);
        assert!(!opened.contains(&(1, 0)));
        assert!(!opened.contains(&(0, 1)));
        assert!(session.is_won());
        assert!(session.elapsed_time() >= Duration::from_millis(10));
    }

    #[test]
    fn revealing_mine_loses_and_opens_only_that_cell() {
        let mut session = session((3, 3), &[(0, 0)]);

        let opened = session.reveal((0, 0)).unwrap();

        assert_eq!(opened, BTreeSet::from([(0, 0)]));
        assert_eq!(session.state(), SessionState::Lost);
        assert!(session.is_lost());
        assert!(session.is_ended());
        assert_eq!(session.opened_count(), 1);
        assert_eq!(session.to_string(), "x##\n###\n###");
    }

    #[test]
    fn revealing_twice_fails() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.reveal((1, 0)).unwrap();

        let err = session.reveal((1, 0)).unwrap_err();

        assert_eq!(err, GameError::AlreadyOpened((1, 0)));
        assert_eq!(err.kind(), ErrorKind::IllegalState);
        assert!(session.is_running());
    }

    #[test]
    fn ended_session_rejects_moves() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.reveal((0, 0)).unwrap();
        let elapsed = session.elapsed_time();

        assert_eq!(session.reveal((2, 2)), Err(GameError::AlreadyEnded));
        assert_eq!(session.opened_count(), 1);
        assert_eq!(session.elapsed_time(), elapsed);
    }

    #[test]
    fn out_of_bounds_reveal_leaves_session_untouched() {
        let mut session = session((3, 3), &[(0, 0)]);

        assert_eq!(session.reveal((3, 0)), Err(GameError::InvalidCoords((3, 0))));
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(!session.is_cell_opened((3, 0)));
    }

    #[test]
    fn border_cell_opened_by_fill_wins() {
        let mut session = session((3, 1), &[(0, 0)]);

        let opened = session.reveal((2, 0)).unwrap();

        assert_eq!(opened, BTreeSet::from([(1, 0), (2, 0)]));
        assert!(session.is_won());
        assert_eq!(
            session.opened_count() + session.minefield().mine_count(),
            session.minefield().total_cells()
        );
    }

    #[test]
    fn fill_stops_at_numbered_border() {
        let mut session = session((5, 1), &[(2, 0)]);

        let opened = session.reveal((0, 0)).unwrap();

        assert_eq!(opened, BTreeSet::from([(0, 0), (1, 0)]));
        assert!(session.is_running());
        assert_eq!(session.to_string(), ".1###");
    }

    #[test]
    fn fill_region_does_not_depend_on_entry_cell() {
        let mines = &[(4, 4), (0, 4), (4, 0), (2, 2)];
        let mut a = session((7, 7), mines);
        let mut b = session((7, 7), mines);

        let from_a = a.reveal((6, 6)).unwrap();
        let from_b = b.reveal((6, 3)).unwrap();

        assert_eq!(from_a, from_b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn new_session_from_seeded_config() {
        let config = GameConfig::new((9, 9), 10).unwrap().with_seed(5);

        let a = GameSession::new(config).unwrap();
        let b = GameSession::new(config).unwrap();

        assert_eq!(a.minefield().mine_count(), 10);
        assert_eq!(a.minefield(), b.minefield());
        assert_eq!(a.state(), SessionState::NotStarted);
    }

    #[test]
    fn new_session_rejects_bad_config() {
        assert_eq!(
            GameSession::new(GameConfig::new_unchecked((1, 1), 1)).unwrap_err(),
            GameError::SingleCell
        );
        assert_eq!(
            GameSession::new(GameConfig::new_unchecked((3, 3), 0)).unwrap_err(),
            GameError::NoMines
        );
        assert_eq!(
            GameSession::new(GameConfig::new_unchecked((3, 3), 9))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidArgument
        );
    }

    struct CornerMine;

    impl MinefieldGenerator for CornerMine {
        fn generate(self, config: GameConfig) -> Result<Minefield> {
            Minefield::from_mine_coords(config.size, &[(0, 0)])
        }
    }

    #[test]
    fn custom_generator_is_used() {
        let config = GameConfig::new((3, 3), 1).unwrap();
        let mut session = GameSession::with_generator(config, CornerMine).unwrap();

        session.reveal((2, 2)).unwrap();

        assert!(session.is_won());
    }

    proptest! {
        #[test]
        fn no_cell_is_opened_twice(
            width in 2u8..10,
            height in 1u8..10,
            seed in any::<u64>(),
            moves in proptest::collection::vec((0u8..10, 0u8..10), 1..60),
        ) {
            let total_cells = area(width, height);
            let config = GameConfig::new((width, height), (total_cells / 5).max(1))
                .unwrap()
                .with_seed(seed);
            let mut session = GameSession::new(config).unwrap();
            let mut seen = BTreeSet::new();

            for coords in moves {
                match session.reveal(coords) {
                    Ok(opened) => {
                        prop_assert!(!opened.is_empty());
                        for cell in opened {
                            prop_assert!(seen.insert(cell), "{:?} opened twice", cell);
                        }
                    }
                    Err(err) => prop_assert!(matches!(
                        err,
                        GameError::InvalidCoords(_) | GameError::AlreadyOpened(_) | GameError::AlreadyEnded
                    )),
                }
            }

            prop_assert_eq!(usize::from(session.opened_count()), seen.len());
            if session.is_won() {
                prop_assert_eq!(
                    session.opened_count() + session.minefield().mine_count(),
                    total_cells
                );
            }
        }
    }
}
