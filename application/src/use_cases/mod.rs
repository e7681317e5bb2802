//! Use cases

pub mod chat_turn;

pub use chat_turn::ChatTurnUseCase;
