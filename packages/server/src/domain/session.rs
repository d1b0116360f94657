//! Per-connection session state machine.
//!
//! ```text
//! Connected --join--> InRoom
//!     |                 |
//!     +---disconnect----+--> Disconnected
//! ```
//!
//! A session joins at most one room for its lifetime. A second join while
//! `InRoom` is rejected instead of silently abandoning the first room.

use super::{
    error::SessionError,
    value_object::{DisplayName, RoomName, SessionId, Timestamp},
};

/// Lifecycle state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Connection established, no room yet
    Connected,
    /// Joined exactly one room
    InRoom { room: RoomName, name: DisplayName },
    /// Terminal state
    Disconnected,
}

/// Server-side state of one live connection
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    connected_at: Timestamp,
    state: SessionState,
}

impl Session {
    /// Create a new session in the `Connected` state
    pub fn new(id: SessionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            connected_at,
            state: SessionState::Connected,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Check that a join may start from the current state.
    ///
    /// # Errors
    ///
    /// `AlreadyInRoom` while `InRoom`, `Disconnected` once terminated
    pub fn ensure_can_join(&self) -> Result<(), SessionError> {
        match &self.state {
            SessionState::Connected => Ok(()),
            SessionState::InRoom { room, .. } => {
                Err(SessionError::AlreadyInRoom(room.to_string()))
            }
            SessionState::Disconnected => Err(SessionError::Disconnected),
        }
    }

    /// Record a completed join (`Connected -> InRoom`)
    pub fn joined(&mut self, room: RoomName, name: DisplayName) -> Result<(), SessionError> {
        self.ensure_can_join()?;
        self.state = SessionState::InRoom { room, name };
        Ok(())
    }

    /// Room and display name of the current membership
    pub fn current_room(&self) -> Result<(&RoomName, &DisplayName), SessionError> {
        match &self.state {
            SessionState::InRoom { room, name } => Ok((room, name)),
            SessionState::Connected => Err(SessionError::NotInRoom),
            SessionState::Disconnected => Err(SessionError::Disconnected),
        }
    }

    /// Move to the terminal state.
    ///
    /// Returns the room the session was in, if any, so the caller can run
    /// the leave sequence. Calling it twice returns `None` the second time.
    pub fn disconnect(&mut self) -> Option<RoomName> {
        match std::mem::replace(&mut self.state, SessionState::Disconnected) {
            SessionState::InRoom { room, .. } => Some(room),
            SessionState::Connected | SessionState::Disconnected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::SessionIdFactory;

    fn create_session() -> Session {
        Session::new(SessionIdFactory::generate(), Timestamp::new(0))
    }

    fn lobby() -> RoomName {
        RoomName::new("lobby".to_string()).unwrap()
    }

    fn alice() -> DisplayName {
        DisplayName::new("Alice".to_string()).unwrap()
    }

    #[test]
    fn test_session_starts_connected() {
        // テスト項目: 新しいセッションは Connected 状態で、ルームを持たない
        let session = create_session();

        assert_eq!(session.state(), &SessionState::Connected);
        assert_eq!(session.current_room(), Err(SessionError::NotInRoom));
    }

    #[test]
    fn test_session_join_moves_to_in_room() {
        // テスト項目: 参加すると InRoom 状態になりルームと表示名が記録される
        // given (前提条件):
        let mut session = create_session();

        // when (操作):
        let result = session.joined(lobby(), alice());

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(session.current_room(), Ok((&lobby(), &alice())));
    }

    #[test]
    fn test_session_second_join_is_rejected() {
        // テスト項目: InRoom 状態での 2 回目の参加は拒否され、状態は変わらない
        // given (前提条件):
        let mut session = create_session();
        session.joined(lobby(), alice()).unwrap();

        // when (操作):
        let other = RoomName::new("other".to_string()).unwrap();
        let result = session.joined(other, alice());

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SessionError::AlreadyInRoom("lobby".to_string()))
        );
        assert_eq!(session.current_room(), Ok((&lobby(), &alice())));
    }

    #[test]
    fn test_session_disconnect_returns_room_once() {
        // テスト項目: 切断時に参加中のルームが一度だけ返され、以後は終端状態になる
        // given (前提条件):
        let mut session = create_session();
        session.joined(lobby(), alice()).unwrap();

        // when (操作):
        let first = session.disconnect();
        let second = session.disconnect();

        // then (期待する結果):
        assert_eq!(first, Some(lobby()));
        assert_eq!(second, None);
        assert_eq!(session.state(), &SessionState::Disconnected);
        assert_eq!(session.ensure_can_join(), Err(SessionError::Disconnected));
    }

    #[test]
    fn test_session_disconnect_without_room() {
        // テスト項目: ルーム未参加のセッションを切断してもルームは返されない
        let mut session = create_session();

        assert_eq!(session.disconnect(), None);
        assert_eq!(session.state(), &SessionState::Disconnected);
    }
}
