//! Ferjetider server.
//!
//! A small web application that shows upcoming car-ferry departures for a
//! fixed set of Sognefjord crossings, together with service disruptions and
//! a "nearest crossing" lookup.

pub mod cache;
pub mod distance;
pub mod entur;
pub mod places;
pub mod situations;
pub mod web;
