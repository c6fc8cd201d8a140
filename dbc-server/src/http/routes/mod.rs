//! Route modules, one per resource

pub mod health;
pub mod zorgproducten;
pub mod specialismen;
pub mod diagnoses;
pub mod reference;
pub mod resolve;
pub mod query;
