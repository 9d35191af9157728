/// Best-effort message delivery
pub mod messaging;
/// Chat transport abstraction and its Telegram implementation
pub mod transport;
