pub mod booking;
pub mod conversation;
pub mod dialogue;
pub mod messaging;
pub mod records;
pub mod scheduling;
pub mod sessions;
pub mod speech;
