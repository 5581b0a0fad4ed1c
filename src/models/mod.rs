pub mod budget;
pub mod goal;
pub mod impulse;
pub mod settings;
pub mod transaction;
