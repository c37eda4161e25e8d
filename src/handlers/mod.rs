pub mod health;
pub mod matriculas;
pub mod resource;
