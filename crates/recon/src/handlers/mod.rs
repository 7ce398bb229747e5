pub mod health;
pub mod reconstruct;
