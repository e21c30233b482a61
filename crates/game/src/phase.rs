//! Turn phases and the events that drive them.

use std::fmt;

use uct_core::{Color, Outcome};

/// Where a game stands between two events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase<M> {
    /// The human side is to move.
    AwaitingHumanMove,

    /// The engine side is to move.
    AwaitingEngineMove,

    /// A pawn move to the last rank arrived without a promotion piece.
    /// The board is unchanged until the piece is chosen.
    PromotionPending { pending: M },

    /// The side to move is in check.
    CheckAcknowledged { in_check: Color },

    /// Terminal. No event is accepted any more.
    GameOver(Outcome),
}

impl<M> TurnPhase<M> {
    pub fn is_game_over(&self) -> bool {
        matches!(self, TurnPhase::GameOver(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            TurnPhase::GameOver(outcome) => Some(*outcome),
            _ => None,
        }
    }

    /// The phase in which `side` is to move, given who plays for the human.
    pub fn awaiting(side: Color, human: Option<Color>) -> Self {
        if human == Some(side) {
            TurnPhase::AwaitingHumanMove
        } else {
            TurnPhase::AwaitingEngineMove
        }
    }
}

impl<M: fmt::Display> fmt::Display for TurnPhase<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnPhase::AwaitingHumanMove => write!(f, "awaiting human move"),
            TurnPhase::AwaitingEngineMove => write!(f, "awaiting engine move"),
            TurnPhase::PromotionPending { pending } => {
                write!(f, "awaiting promotion choice for {}", pending)
            }
            TurnPhase::CheckAcknowledged { in_check } => write!(f, "{} is in check", in_check),
            TurnPhase::GameOver(outcome) => write!(f, "game over ({})", outcome),
        }
    }
}

/// Input to the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEvent<M, P> {
    HumanMove(M),
    EngineMove(M),
    PromotionChoice(P),
    AcknowledgeCheck,
    Resign(Color),
}

impl<M, P> TurnEvent<M, P> {
    pub fn name(&self) -> &'static str {
        match self {
            TurnEvent::HumanMove(_) => "human move",
            TurnEvent::EngineMove(_) => "engine move",
            TurnEvent::PromotionChoice(_) => "promotion choice",
            TurnEvent::AcknowledgeCheck => "check acknowledgement",
            TurnEvent::Resign(_) => "resignation",
        }
    }

    /// Whether the event carries a move.
    pub fn is_move(&self) -> bool {
        matches!(self, TurnEvent::HumanMove(_) | TurnEvent::EngineMove(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awaiting_follows_human_color() {
        type Phase = TurnPhase<u8>;
        assert_eq!(Phase::awaiting(Color::White, Some(Color::White)), TurnPhase::AwaitingHumanMove);
        assert_eq!(Phase::awaiting(Color::Black, Some(Color::White)), TurnPhase::AwaitingEngineMove);
        assert_eq!(Phase::awaiting(Color::White, None), TurnPhase::AwaitingEngineMove);
    }

    #[test]
    fn test_phase_display() {
        let over: TurnPhase<u8> = TurnPhase::GameOver(Outcome::Stalemate);
        assert_eq!(over.to_string(), "game over (draw by stalemate)");
        assert!(over.is_game_over());
        assert_eq!(over.outcome(), Some(Outcome::Stalemate));

        let pending = TurnPhase::PromotionPending { pending: 7u8 };
        assert_eq!(pending.to_string(), "awaiting promotion choice for 7");
        assert_eq!(pending.outcome(), None);
    }

    #[test]
    fn test_event_names() {
        let event: TurnEvent<u8, char> = TurnEvent::PromotionChoice('q');
        assert_eq!(event.name(), "promotion choice");
        assert!(!event.is_move());
        assert!(TurnEvent::<u8, char>::EngineMove(1).is_move());
    }
}
