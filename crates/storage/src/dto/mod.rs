pub mod competition;
pub mod participant;
