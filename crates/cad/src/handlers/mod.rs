pub mod cad;
pub mod health;
