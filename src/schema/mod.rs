pub mod action_type;
pub mod event;
pub mod motivation;
pub mod objective;
