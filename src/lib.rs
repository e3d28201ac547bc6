//! Formation Autoresolve - automated resolution of formation combat

pub mod battle;
pub mod core;
