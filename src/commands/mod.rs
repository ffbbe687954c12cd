pub mod bootstrap;
pub mod doctor;
