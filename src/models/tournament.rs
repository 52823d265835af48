//! Tournament aggregate, its settings, and the error type shared by all operations.

use crate::models::game::{Fixture, Game, GameId, GameStatus};
use crate::models::group::{Group, GroupId};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Broad category of a [`TournamentError`], used by callers to pick a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The request cannot be served yet (too few players, too few groups, wrong phase).
    PreconditionNotMet,
    /// The request would leave the tournament inconsistent; nothing was written.
    InconsistentState,
    /// A venue or a player is already held by another game.
    ResourceConflict,
    /// A referenced player or game does not exist.
    NotFound,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Not enough players for the requested draw.
    NotEnoughPlayers { required: usize, found: usize },
    /// The groups format needs at least 2 groups.
    NotEnoughGroups { requested: u32 },
    /// Every group needs at least one player.
    TooManyGroups { requested: u32, players: usize },
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Player names must not be empty.
    EmptyPlayerName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// The same player appears twice in a group or player list.
    DuplicatePlayer(PlayerId),
    PlayerNotFound(PlayerId),
    GroupNotFound(GroupId),
    GameNotFound(GameId),
    /// Playoff games must have a winner.
    DrawNotAllowed(GameId),
    /// Venues are numbered from 1 up to the tournament's venue count.
    InvalidVenue(u32),
    /// Venue count must be at least 1.
    InvalidVenuesCount,
    /// The game is already finished and cannot be put on a venue.
    GameAlreadyFinished(GameId),
    /// Another game is in progress on this venue.
    VenueOccupied { venue: u32 },
    /// The player is already playing another game.
    PlayerBusy(PlayerId),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            NotEnoughPlayers { .. }
            | NotEnoughGroups { .. }
            | TooManyGroups { .. }
            | InvalidState => ErrorKind::PreconditionNotMet,
            EmptyPlayerName
            | DuplicatePlayerName
            | DuplicatePlayer(_)
            | DrawNotAllowed(_)
            | InvalidVenue(_)
            | InvalidVenuesCount
            | GameAlreadyFinished(_) => ErrorKind::InconsistentState,
            VenueOccupied { .. } | PlayerBusy(_) => ErrorKind::ResourceConflict,
            PlayerNotFound(_) | GroupNotFound(_) | GameNotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotEnoughPlayers { required, found } => {
                write!(f, "Need at least {} players (found {})", required, found)
            }
            TournamentError::NotEnoughGroups { requested } => {
                write!(f, "The groups format needs at least 2 groups (requested {})", requested)
            }
            TournamentError::TooManyGroups { requested, players } => {
                write!(f, "Cannot draw {} groups from {} players", requested, players)
            }
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            TournamentError::DuplicatePlayerName => {
                write!(f, "A player with this name already exists")
            }
            TournamentError::DuplicatePlayer(id) => {
                write!(f, "Player {} appears more than once", id)
            }
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::GroupNotFound(_) => write!(f, "Group not found"),
            TournamentError::GameNotFound(_) => write!(f, "Game not found"),
            TournamentError::DrawNotAllowed(_) => write!(f, "A playoff game cannot end in a draw"),
            TournamentError::InvalidVenue(venue) => write!(f, "Venue {} does not exist", venue),
            TournamentError::InvalidVenuesCount => write!(f, "Venue count must be at least 1"),
            TournamentError::GameAlreadyFinished(_) => write!(f, "Game is already finished"),
            TournamentError::VenueOccupied { venue } => {
                write!(f, "Venue {} is already occupied", venue)
            }
            TournamentError::PlayerBusy(_) => {
                write!(f, "One of the players is playing another game")
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How the tournament is played.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Everyone plays everyone once.
    #[default]
    RoundRobin,
    /// Round-robin groups followed by a single-elimination playoff.
    Groups,
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Adding players and settings; no draw yet.
    #[default]
    Draft,
    InProgress,
    Finished,
}

/// Points awarded per game result.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRule {
    pub points_win: u32,
    pub points_draw: u32,
    pub points_loss: u32,
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            points_win: 3,
            points_draw: 1,
            points_loss: 0,
        }
    }
}

/// Full tournament state: settings, players, groups and every game.
///
/// This is the caller-owned snapshot the scheduling logic reads and inserts into.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub format: TournamentFormat,
    pub scoring: ScoringRule,
    /// Number of groups to draw (groups format only).
    pub number_of_groups: Option<u32>,
    /// Number of venues (tables, boards, courts); unlimited when None.
    pub venues_count: Option<u32>,
    pub status: TournamentStatus,
    pub players: Vec<Player>,
    /// Groups in creation order.
    pub groups: Vec<Group>,
    /// Games in creation order.
    pub games: Vec<Game>,
    next_sequence: u64,
}

impl Tournament {
    /// Create a new tournament in Draft state with no players.
    pub fn new(name: impl Into<String>, format: TournamentFormat, scoring: ScoringRule) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            start_date: None,
            created_at: Utc::now(),
            format,
            scoring,
            number_of_groups: None,
            venues_count: None,
            status: TournamentStatus::Draft,
            players: Vec::new(),
            groups: Vec::new(),
            games: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Create a tournament with initial players. Still in Draft until the draw is generated.
    pub fn with_players(
        name: impl Into<String>,
        format: TournamentFormat,
        scoring: ScoringRule,
        players: Vec<Player>,
    ) -> Self {
        Self {
            players,
            ..Self::new(name, format, scoring)
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn game(&self, id: GameId) -> Result<&Game, TournamentError> {
        self.games
            .iter()
            .find(|g| g.id == id)
            .ok_or(TournamentError::GameNotFound(id))
    }

    pub fn game_mut(&mut self, id: GameId) -> Result<&mut Game, TournamentError> {
        self.games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(TournamentError::GameNotFound(id))
    }

    /// Add a player (only valid in Draft). Names must be unique (case-insensitive).
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, TournamentError> {
        if self.status != TournamentStatus::Draft {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = self.check_player_name(&name, None)?;
        let player = Player::new(name_trimmed);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Rename a player (any state). The new name must not clash with another player.
    pub fn rename_player(
        &mut self,
        player_id: PlayerId,
        name: &str,
    ) -> Result<(), TournamentError> {
        let name_trimmed = self.check_player_name(name, Some(player_id))?.to_string();
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        player.name = name_trimmed;
        Ok(())
    }

    /// Remove a player by id (only valid in Draft).
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Draft {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    fn check_player_name<'a>(
        &self,
        name: &'a str,
        ignore: Option<PlayerId>,
    ) -> Result<&'a str, TournamentError> {
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyPlayerName);
        }
        let is_duplicate = self
            .players
            .iter()
            .filter(|p| Some(p.id) != ignore)
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        Ok(name_trimmed)
    }

    /// Check the drawn groups against the player list: every member must be a player of
    /// this tournament and nobody may sit in two groups (or twice in one).
    pub fn check_groups(&self) -> Result<(), TournamentError> {
        let mut seen = HashSet::new();
        for player_id in self.groups.iter().flat_map(|g| g.players.iter().copied()) {
            if self.player(player_id).is_none() {
                return Err(TournamentError::PlayerNotFound(player_id));
            }
            if !seen.insert(player_id) {
                return Err(TournamentError::DuplicatePlayer(player_id));
            }
        }
        Ok(())
    }

    pub fn set_number_of_groups(&mut self, number_of_groups: u32) -> Result<(), TournamentError> {
        if number_of_groups < 2 {
            return Err(TournamentError::NotEnoughGroups {
                requested: number_of_groups,
            });
        }
        self.number_of_groups = Some(number_of_groups);
        Ok(())
    }

    pub fn set_venues_count(&mut self, venues_count: u32) -> Result<(), TournamentError> {
        if venues_count < 1 {
            return Err(TournamentError::InvalidVenuesCount);
        }
        self.venues_count = Some(venues_count);
        Ok(())
    }

    pub fn set_scoring(&mut self, scoring: ScoringRule) {
        self.scoring = scoring;
    }

    /// Insert a batch of fixtures as games, preserving batch order as creation order.
    /// Returns the ids of the new games.
    pub fn insert_fixtures(&mut self, fixtures: Vec<Fixture>) -> Vec<GameId> {
        let mut ids = Vec::with_capacity(fixtures.len());
        for fixture in fixtures {
            let game = Game::from_fixture(fixture, self.next_sequence);
            self.next_sequence += 1;
            ids.push(game.id);
            self.games.push(game);
        }
        ids
    }

    /// Delete every game matching the predicate. Returns how many were removed.
    pub fn delete_games_where(&mut self, predicate: impl Fn(&Game) -> bool) -> usize {
        let before = self.games.len();
        self.games.retain(|g| !predicate(g));
        before - self.games.len()
    }

    /// Delete all games and groups (before a new draw).
    pub fn clear_draw(&mut self) {
        self.games.clear();
        self.groups.clear();
    }

    /// Playoff games of one bracket round, in creation order.
    pub fn playoff_round(&self, round: u32) -> Vec<&Game> {
        let mut games: Vec<&Game> = self
            .games
            .iter()
            .filter(|g| g.is_playoff() && g.round == round)
            .collect();
        games.sort_by_key(|g| g.sequence);
        games
    }

    pub fn has_playoff_games(&self) -> bool {
        self.games.iter().any(Game::is_playoff)
    }

    pub fn has_unfinished_games(&self) -> bool {
        self.games.iter().any(|g| g.status != GameStatus::Finished)
    }

    pub fn has_unfinished_group_games(&self) -> bool {
        self.games
            .iter()
            .any(|g| !g.is_playoff() && g.status != GameStatus::Finished)
    }
}
