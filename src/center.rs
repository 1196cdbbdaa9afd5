use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::info;
use parking_lot::{Mutex, RwLock};

use crate::ai::{AutomatedOpponent, AutomatedTurn, PacingOutcome};
use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::GameError;
use crate::game::{GameSession, Outcome, Player, SessionId};
use crate::types::PieceColor;

pub type SharedSession = Arc<Mutex<GameSession>>;

#[derive(Debug, Default)]
struct Registry {
    sessions: HashMap<SessionId, SharedSession>,
    by_player: HashMap<String, SessionId>,
}

/// Process-wide registry of running sessions.
///
/// The registry lock is only held for lookups and bookkeeping; each session
/// carries its own lock for moves.
#[derive(Debug)]
pub struct GameCenter {
    registry: RwLock<Registry>,
    next_session: AtomicU64,
    next_automated: AtomicU64,
    config: EngineConfig,
}

impl Default for GameCenter {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl GameCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
            next_session: AtomicU64::new(1),
            next_automated: AtomicU64::new(1),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Two humans; `red` moves first.
    pub fn create_session(&self, red: &str, white: &str) -> Result<SessionId, GameError> {
        self.create_session_with(Player::human(red), Player::human(white), Board::new())
    }

    /// `human` plays Red against a fresh automated White.
    pub fn create_automated_session(&self, human: &str) -> Result<SessionId, GameError> {
        let serial = self.next_automated.fetch_add(1, Ordering::Relaxed);
        let opponent = AutomatedOpponent::with_default_selector(self.config.clone());
        let automated = Player::automated(self.config.automated_name(serial), opponent);
        self.create_session_with(Player::human(human), automated, Board::new())
    }

    /// Registers a session over an arbitrary starting board. Red moves
    /// first.
    pub fn create_session_with(
        &self,
        red: Player,
        white: Player,
        board: Board,
    ) -> Result<SessionId, GameError> {
        let mut registry = self.registry.write();
        for name in [red.name(), white.name()] {
            if registry.by_player.contains_key(name) {
                return Err(GameError::PlayerAlreadyInGame(name.to_string()));
            }
        }
        if red.name() == white.name() {
            return Err(GameError::PlayerAlreadyInGame(red.name().to_string()));
        }

        let id = SessionId(self.next_session.fetch_add(1, Ordering::Relaxed));
        registry.by_player.insert(red.name().to_string(), id);
        registry.by_player.insert(white.name().to_string(), id);
        let session = GameSession::with_board(id, red, white, board, PieceColor::Red);
        registry.sessions.insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    pub fn session(&self, id: SessionId) -> Option<SharedSession> {
        self.registry.read().sessions.get(&id).cloned()
    }

    fn require(&self, id: SessionId) -> Result<SharedSession, GameError> {
        self.session(id).ok_or(GameError::SessionNotFound(id))
    }

    pub fn find_session_for(&self, player: &str) -> Option<SharedSession> {
        let registry = self.registry.read();
        let id = registry.by_player.get(player)?;
        registry.sessions.get(id).cloned()
    }

    pub fn player_in_any_game(&self, player: &str) -> bool {
        self.registry.read().by_player.contains_key(player)
    }

    /// Name of the player whose move it is, while the game is on.
    pub fn active_turn_owner(&self, id: SessionId) -> Option<String> {
        let session = self.session(id)?;
        let session = session.lock();
        (!session.is_over()).then(|| session.active_player().name().to_string())
    }

    pub fn resign(&self, player: &str) -> Result<Outcome, GameError> {
        let session = self
            .find_session_for(player)
            .ok_or_else(|| GameError::PlayerNotInGame(player.to_string()))?;
        let outcome = session.lock().resign(player)?;
        info!("{player} resigned");
        Ok(outcome)
    }

    /// Drops the session and frees its players' names.
    pub fn remove_session(&self, id: SessionId) -> Option<SharedSession> {
        let mut registry = self.registry.write();
        let removed = registry.sessions.remove(&id)?;
        registry.by_player.retain(|_, session| *session != id);
        info!("session {id} removed");
        Some(removed)
    }

    /// Marks the end of `player`'s game as seen; the session is removed
    /// once every human player has seen it. Returns whether it was removed.
    pub fn acknowledge_end(&self, player: &str) -> Result<bool, GameError> {
        let session = self
            .find_session_for(player)
            .ok_or_else(|| GameError::PlayerNotInGame(player.to_string()))?;
        let (id, done) = {
            let mut session = session.lock();
            (session.id(), session.acknowledge_end(player)?)
        };
        if done {
            self.remove_session(id);
        }
        Ok(done)
    }

    pub fn session_count(&self) -> usize {
        self.registry.read().sessions.len()
    }

    /// Waits out the automated side's pacing without holding the session
    /// lock, then plays its turn. Returns `None` when the game is over or
    /// the turn changed hands during the wait.
    pub fn run_automated_turn(&self, id: SessionId) -> Result<Option<AutomatedTurn>, GameError> {
        let shared = self.require(id)?;
        let pacing = {
            let session = shared.lock();
            if session.is_over() {
                return Ok(None);
            }
            session.automated_pacing()?
        };

        if pacing.wait() == PacingOutcome::Cancelled {
            return Ok(None);
        }

        let mut session = shared.lock();
        if session.automated_to_move().is_none() {
            return Ok(None);
        }
        session.play_automated_turn().map(Some)
    }
}
