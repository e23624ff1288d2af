use crate::grid::Position;

/// Notifications for the audio, particle and UI collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    BeneficialEat { position: Position },
    HarmfulEat { position: Position },
    GameWon { winner: String, score: u32 },
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct Silent;

impl EventSink for Silent {
    fn emit(&mut self, _event: GameEvent) {}
}
