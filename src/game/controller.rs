use crate::ai::{Agent, BotAgent, Difficulty};
use crate::error::{GameError, MoveError};
use crate::net::Peer;

use super::{Board, Grid, PlayerMark, Position};

/// Who owns the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player1,
    Player2,
    Bot,
}

impl Side {
    /// Mark placed on the board. The bot plays as player two.
    pub fn mark(self) -> PlayerMark {
        match self {
            Side::Player1 => PlayerMark::Player1,
            Side::Player2 | Side::Bot => PlayerMark::Player2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Player1 => "Player 1",
            Side::Player2 => "Player 2",
            Side::Bot => "Computer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    AwaitingMove(Side),
    GameOver(Outcome),
}

/// Which end of a networked game this process is. The host moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkRole {
    Host,
    Join,
}

impl NetworkRole {
    pub fn local_side(self) -> Side {
        match self {
            NetworkRole::Host => Side::Player1,
            NetworkRole::Join => Side::Player2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Local,
    Solo(Difficulty),
    Network(NetworkRole),
}

/// Notifications for whoever renders the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CellChanged { position: Position, mark: PlayerMark },
    /// Hover marker above a column; `None` clears it.
    EntryHover { column: usize, mark: Option<PlayerMark> },
    GameOver(Outcome),
}

enum Opponent {
    Local,
    Bot {
        difficulty: Difficulty,
        agent: Box<dyn Agent>,
    },
    Remote {
        role: NetworkRole,
        peer: Box<dyn Peer>,
    },
}

/// Turn order, move application and end-of-game detection for one game.
///
/// A controller is single use: once the game is over, [`Controller::replay`]
/// hands back a fresh one with a new board.
pub struct Controller {
    board: Board,
    state: GameState,
    opponent: Opponent,
    events: Vec<GameEvent>,
}

impl Controller {
    /// Two players sharing this terminal.
    pub fn local() -> Self {
        Self::from_parts(Board::new(), Opponent::Local)
    }

    /// Player one against the rule-based bot.
    pub fn solo(difficulty: Difficulty) -> Self {
        Self::with_bot(difficulty, Box::new(BotAgent::new(difficulty)))
    }

    /// Player one against a custom agent playing as the bot.
    pub fn with_bot(difficulty: Difficulty, agent: Box<dyn Agent>) -> Self {
        Self::from_parts(Board::new(), Opponent::Bot { difficulty, agent })
    }

    /// A game against a remote peer.
    pub fn networked(role: NetworkRole, peer: Box<dyn Peer>) -> Self {
        Self::from_parts(Board::new(), Opponent::Remote { role, peer })
    }

    fn from_parts(board: Board, opponent: Opponent) -> Self {
        Controller {
            board,
            state: GameState::AwaitingMove(Side::Player1),
            opponent,
            events: Vec::new(),
        }
    }

    /// A brand-new game with the same mode, keeping the bot or connection.
    pub fn replay(self) -> Self {
        Self::from_parts(Board::with_size(self.board.cols(), self.board.rows()), self.opponent)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn mode(&self) -> GameMode {
        match &self.opponent {
            Opponent::Local => GameMode::Local,
            Opponent::Bot { difficulty, .. } => GameMode::Solo(*difficulty),
            Opponent::Remote { role, .. } => GameMode::Network(*role),
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            GameState::GameOver(outcome) => Some(outcome),
            GameState::AwaitingMove(_) => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Side to move, `None` once the game is over.
    pub fn active_side(&self) -> Option<Side> {
        match self.state {
            GameState::AwaitingMove(side) => Some(side),
            GameState::GameOver(_) => None,
        }
    }

    fn is_local(&self, side: Side) -> bool {
        match &self.opponent {
            Opponent::Local => true,
            Opponent::Bot { .. } => side == Side::Player1,
            Opponent::Remote { role, .. } => side == role.local_side(),
        }
    }

    /// True while the game waits on input from this process's user.
    pub fn is_local_turn(&self) -> bool {
        self.active_side().is_some_and(|side| self.is_local(side))
    }

    /// True while the game waits on the remote peer's column.
    pub fn awaiting_remote(&self) -> bool {
        matches!(self.opponent, Opponent::Remote { .. })
            && self.active_side().is_some_and(|side| !self.is_local(side))
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Show the active player's piece above `column`.
    pub fn hover(&mut self, column: usize) {
        if column >= self.board.cols() || !self.is_local_turn() {
            return;
        }
        if let Some(side) = self.active_side() {
            self.events.push(GameEvent::EntryHover {
                column,
                mark: Some(side.mark()),
            });
        }
    }

    pub fn clear_hover(&mut self, column: usize) {
        self.events.push(GameEvent::EntryHover { column, mark: None });
    }

    /// Play a column for the local side to move.
    ///
    /// Returns `Ok(false)` when the column cannot take a piece; nothing
    /// changes in that case. In solo games the bot's reply is played before
    /// this returns. In networked games the column is sent to the peer.
    pub fn submit_move(&mut self, column: usize) -> Result<bool, GameError> {
        let side = match self.state {
            GameState::GameOver(_) => return Err(MoveError::GameOver.into()),
            GameState::AwaitingMove(side) => side,
        };
        if !self.is_local(side) {
            return Err(MoveError::NotYourTurn.into());
        }
        if !self.apply(side, column)? {
            return Ok(false);
        }
        self.play_bot_turn()?;
        Ok(true)
    }

    /// Block until the remote peer sends its column and play it.
    ///
    /// Returns `Ok(None)` when the wait was canceled or the column could not
    /// take a piece; the game state is unchanged then.
    pub fn await_remote_move(&mut self) -> Result<Option<usize>, GameError> {
        if !self.awaiting_remote() {
            return Err(MoveError::NotYourTurn.into());
        }
        let Some(side) = self.active_side() else {
            return Err(MoveError::GameOver.into());
        };
        let received = match &mut self.opponent {
            Opponent::Remote { peer, .. } => peer.receive_column()?,
            _ => None,
        };
        let Some(column) = received else {
            tracing::info!("wait for remote move canceled");
            return Ok(None);
        };
        if self.apply(side, column)? {
            Ok(Some(column))
        } else {
            tracing::warn!(column, "remote move could not be played");
            Ok(None)
        }
    }

    fn play_bot_turn(&mut self) -> Result<(), GameError> {
        while self.state == GameState::AwaitingMove(Side::Bot) {
            let legal = self.board.legal_columns();
            let column = match &mut self.opponent {
                Opponent::Bot { agent, .. } => {
                    let column = agent.select_column(&self.board, &legal);
                    tracing::debug!(agent = agent.name(), column, "bot chose column");
                    column
                }
                _ => unreachable!("bot turn without a bot opponent"),
            };
            if !self.apply(Side::Bot, column)? {
                return Err(MoveError::ColumnFull(column).into());
            }
        }
        Ok(())
    }

    /// Drop a piece for `side` and advance the state machine.
    fn apply(&mut self, side: Side, column: usize) -> Result<bool, GameError> {
        let row = match self.board.drop(column, side.mark()) {
            Ok(row) => row,
            Err(MoveError::ColumnFull(_) | MoveError::InvalidColumn(_)) => {
                tracing::debug!(column, side = side.name(), "drop rejected");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        self.events.push(GameEvent::CellChanged {
            position: Position::new(column as i32, row as i32),
            mark: side.mark(),
        });
        self.events.push(GameEvent::EntryHover { column, mark: None });
        tracing::debug!(column, row, side = side.name(), "piece dropped");

        self.state = if self.board.is_full() {
            GameState::GameOver(Outcome::Draw)
        } else if self.board.has_connected_four() {
            GameState::GameOver(Outcome::Win(side))
        } else {
            GameState::AwaitingMove(self.next_side(side))
        };

        if let GameState::GameOver(outcome) = self.state {
            tracing::info!(?outcome, "game over");
            self.events.push(GameEvent::GameOver(outcome));
        }

        // The move stands even if the peer never hears about it.
        if self.is_local(side) {
            if let Opponent::Remote { peer, .. } = &mut self.opponent {
                peer.send_column(column)?;
            }
        }
        Ok(true)
    }

    fn next_side(&self, side: Side) -> Side {
        match (side, &self.opponent) {
            (Side::Player1, Opponent::Bot { .. }) => Side::Bot,
            (Side::Player1, _) => Side::Player2,
            (Side::Player2 | Side::Bot, _) => Side::Player1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Always plays the leftmost legal column.
    struct LeftmostAgent;

    impl Agent for LeftmostAgent {
        fn select_column(&mut self, _board: &Board, legal_columns: &[usize]) -> usize {
            legal_columns[0]
        }

        fn name(&self) -> &str {
            "Leftmost"
        }
    }

    enum Incoming {
        Column(usize),
        Canceled,
        Malformed(u8),
    }

    #[derive(Default)]
    struct Wire {
        incoming: VecDeque<Incoming>,
        sent: Vec<usize>,
    }

    struct FakePeer(Rc<RefCell<Wire>>);

    impl Peer for FakePeer {
        fn send_column(&mut self, column: usize) -> Result<(), NetworkError> {
            self.0.borrow_mut().sent.push(column);
            Ok(())
        }

        fn receive_column(&mut self) -> Result<Option<usize>, NetworkError> {
            match self.0.borrow_mut().incoming.pop_front() {
                Some(Incoming::Column(column)) => Ok(Some(column)),
                Some(Incoming::Canceled) => Ok(None),
                Some(Incoming::Malformed(byte)) => Err(NetworkError::Malformed(byte)),
                None => Err(NetworkError::Disconnected),
            }
        }
    }

    /// A connection that fails on every call.
    struct BrokenPeer;

    impl Peer for BrokenPeer {
        fn send_column(&mut self, _column: usize) -> Result<(), NetworkError> {
            Err(NetworkError::Disconnected)
        }

        fn receive_column(&mut self) -> Result<Option<usize>, NetworkError> {
            Err(NetworkError::Disconnected)
        }
    }

    fn networked(role: NetworkRole, incoming: Vec<Incoming>) -> (Controller, Rc<RefCell<Wire>>) {
        let wire = Rc::new(RefCell::new(Wire {
            incoming: incoming.into(),
            sent: Vec::new(),
        }));
        let controller = Controller::networked(role, Box::new(FakePeer(wire.clone())));
        (controller, wire)
    }

    #[test]
    fn test_initial_state() {
        let controller = Controller::local();
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
        assert_eq!(controller.mode(), GameMode::Local);
        assert!(controller.is_local_turn());
        assert!(!controller.awaiting_remote());
        assert_eq!(controller.board().legal_columns().len(), 7);
    }

    #[test]
    fn test_local_turns_alternate() {
        let mut controller = Controller::local();
        assert!(controller.submit_move(3).unwrap());
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player2));
        assert!(controller.submit_move(3).unwrap());
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
        assert_eq!(
            controller.board().mark_at(Position::new(3, 4)),
            PlayerMark::Player2
        );
    }

    #[test]
    fn test_full_column_keeps_turn() {
        let mut controller = Controller::local();
        for _ in 0..6 {
            controller.submit_move(0).unwrap();
        }
        controller.drain_events();
        let before = controller.board().clone();
        assert!(!controller.submit_move(0).unwrap());
        assert!(!controller.submit_move(9).unwrap());
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
        assert_eq!(controller.board(), &before);
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_vertical_win() {
        let mut controller = Controller::local();
        for _ in 0..3 {
            controller.submit_move(0).unwrap();
            controller.submit_move(1).unwrap();
        }
        controller.submit_move(0).unwrap();
        assert_eq!(
            controller.state(),
            GameState::GameOver(Outcome::Win(Side::Player1))
        );
        assert!(matches!(
            controller.submit_move(2),
            Err(GameError::Move(MoveError::GameOver))
        ));
        let events = controller.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver(Outcome::Win(Side::Player1)))
        );
    }

    #[test]
    fn test_draw_on_full_board() {
        let moves = [
            2, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 6, 4, 4,
            4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 6,
        ];
        let mut controller = Controller::local();
        for (i, &column) in moves.iter().enumerate() {
            assert!(!controller.is_over(), "game ended early at move {i}");
            assert!(controller.submit_move(column).unwrap());
        }
        assert!(controller.board().is_full());
        assert!(!controller.board().has_connected_four());
        assert_eq!(controller.state(), GameState::GameOver(Outcome::Draw));
    }

    #[test]
    fn test_filling_move_is_a_draw_even_with_four() {
        let board = Board::from_rows(&["XXX.", "OOXX", "XXOO", "OOXX"]).unwrap();
        let mut controller = Controller::from_parts(board, Opponent::Local);
        controller.submit_move(3).unwrap();
        assert!(controller.board().has_connected_four());
        assert_eq!(controller.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_bot_replies_within_submit() {
        let mut controller = Controller::with_bot(Difficulty::Easy, Box::new(LeftmostAgent));
        assert!(controller.submit_move(4).unwrap());
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
        assert_eq!(
            controller.board().mark_at(Position::new(0, 5)),
            PlayerMark::Player2
        );

        let cells: Vec<_> = controller
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::CellChanged { position, mark } => Some((position, mark)),
                _ => None,
            })
            .collect();
        assert_eq!(
            cells,
            vec![
                (Position::new(4, 5), PlayerMark::Player1),
                (Position::new(0, 5), PlayerMark::Player2),
            ]
        );
    }

    #[test]
    fn test_bot_can_win() {
        let mut controller = Controller::with_bot(Difficulty::Easy, Box::new(LeftmostAgent));
        for _ in 0..3 {
            controller.submit_move(6).unwrap();
        }
        // Bot stacked column 0 three times; this reply makes four.
        controller.submit_move(5).unwrap();
        assert_eq!(controller.outcome(), Some(Outcome::Win(Side::Bot)));
    }

    #[test]
    fn test_medium_bot_blocks_open_three() {
        let board = Board::from_rows(&[
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "XX...O.",
        ])
        .unwrap();
        let agent = Box::new(BotAgent::with_seed(Difficulty::Medium, 5));
        let mut controller = Controller::from_parts(
            board,
            Opponent::Bot {
                difficulty: Difficulty::Medium,
                agent,
            },
        );
        controller.submit_move(2).unwrap();
        assert_eq!(
            controller.board().mark_at(Position::new(3, 5)),
            PlayerMark::Player2,
            "bot should have blocked column 3:\n{}",
            controller.board()
        );
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
    }

    #[test]
    fn test_hover_events() {
        let mut controller = Controller::local();
        controller.hover(2);
        controller.hover(42);
        controller.clear_hover(2);
        assert_eq!(
            controller.drain_events(),
            vec![
                GameEvent::EntryHover { column: 2, mark: Some(PlayerMark::Player1) },
                GameEvent::EntryHover { column: 2, mark: None },
            ]
        );

        controller.submit_move(2).unwrap();
        controller.drain_events();
        controller.hover(5);
        assert_eq!(
            controller.drain_events(),
            vec![GameEvent::EntryHover { column: 5, mark: Some(PlayerMark::Player2) }]
        );
    }

    #[test]
    fn test_host_sends_and_receives() {
        let (mut controller, wire) =
            networked(NetworkRole::Host, vec![Incoming::Column(4)]);
        assert!(controller.is_local_turn());

        controller.submit_move(3).unwrap();
        assert_eq!(wire.borrow().sent, vec![3]);
        assert!(controller.awaiting_remote());
        assert!(matches!(
            controller.submit_move(2),
            Err(GameError::Move(MoveError::NotYourTurn))
        ));

        assert_eq!(controller.await_remote_move().unwrap(), Some(4));
        assert_eq!(
            controller.board().mark_at(Position::new(4, 5)),
            PlayerMark::Player2
        );
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
        // Remote moves are not echoed back.
        assert_eq!(wire.borrow().sent, vec![3]);
    }

    #[test]
    fn test_joiner_waits_for_host_first() {
        let (mut controller, wire) =
            networked(NetworkRole::Join, vec![Incoming::Column(0)]);
        assert!(controller.awaiting_remote());
        assert!(!controller.is_local_turn());
        assert_eq!(controller.await_remote_move().unwrap(), Some(0));
        assert_eq!(
            controller.board().mark_at(Position::new(0, 5)),
            PlayerMark::Player1
        );
        controller.submit_move(1).unwrap();
        assert_eq!(wire.borrow().sent, vec![1]);
    }

    #[test]
    fn test_canceled_wait_changes_nothing() {
        let (mut controller, _wire) =
            networked(NetworkRole::Join, vec![Incoming::Canceled]);
        assert_eq!(controller.await_remote_move().unwrap(), None);
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_malformed_byte_is_a_connection_failure() {
        let (mut controller, _wire) =
            networked(NetworkRole::Join, vec![Incoming::Malformed(b'x')]);
        assert!(matches!(
            controller.await_remote_move(),
            Err(GameError::Network(NetworkError::Malformed(b'x')))
        ));
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
    }

    #[test]
    fn test_failed_send_still_passes_the_turn() {
        let mut controller = Controller::networked(NetworkRole::Host, Box::new(BrokenPeer));
        assert!(matches!(
            controller.submit_move(3),
            Err(GameError::Network(NetworkError::Disconnected))
        ));
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player2));
        assert_eq!(
            controller.board().mark_at(Position::new(3, 5)),
            PlayerMark::Player1
        );

        assert!(matches!(
            controller.submit_move(3),
            Err(GameError::Move(MoveError::NotYourTurn))
        ));
        assert_eq!(
            controller.board().mark_at(Position::new(3, 4)),
            PlayerMark::Empty
        );
    }

    #[test]
    fn test_failed_send_on_winning_move_ends_game() {
        let board = Board::from_rows(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "....OO.",
            "XXX.OO.",
        ])
        .unwrap();
        let mut controller = Controller::from_parts(
            board,
            Opponent::Remote {
                role: NetworkRole::Host,
                peer: Box::new(BrokenPeer),
            },
        );
        assert!(controller.submit_move(3).is_err());
        assert_eq!(controller.outcome(), Some(Outcome::Win(Side::Player1)));
        assert!(controller
            .drain_events()
            .contains(&GameEvent::GameOver(Outcome::Win(Side::Player1))));
        assert!(matches!(
            controller.submit_move(6),
            Err(GameError::Move(MoveError::GameOver))
        ));
    }

    #[test]
    fn test_await_remote_outside_network_game() {
        let mut controller = Controller::local();
        assert!(matches!(
            controller.await_remote_move(),
            Err(GameError::Move(MoveError::NotYourTurn))
        ));
    }

    #[test]
    fn test_replay_builds_fresh_game() {
        let mut controller = Controller::with_bot(Difficulty::Hard, Box::new(LeftmostAgent));
        for _ in 0..4 {
            controller.submit_move(6).unwrap();
        }
        assert!(controller.is_over());
        let controller = controller.replay();
        assert_eq!(controller.mode(), GameMode::Solo(Difficulty::Hard));
        assert_eq!(controller.state(), GameState::AwaitingMove(Side::Player1));
        assert_eq!(controller.board(), &Board::new());
    }
}
