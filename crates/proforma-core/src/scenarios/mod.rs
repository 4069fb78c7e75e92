pub mod comparison;
pub mod sensitivity;
