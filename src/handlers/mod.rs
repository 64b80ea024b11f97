pub mod calls;
pub mod health;
pub mod voice;
