//! Offline-first day tracker: food, workouts and weigh-ins recorded per
//! calendar day, closed off one day at a time.

pub mod coerce;
pub mod date;
mod days;
pub mod db;
pub mod engine;
pub mod error;
mod food;
mod library;
pub mod models;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;
mod weigh;
pub mod workout;
