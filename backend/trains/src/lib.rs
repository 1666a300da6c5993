pub mod board;
pub mod boundary;
pub mod checker;
pub mod city;
pub mod color;
pub mod config;
pub mod deck;
pub mod game_phase;
pub mod game_state;
pub mod participant;
pub mod record;
pub mod referee;
pub mod report;
pub mod scoring;
pub mod strategy;
pub mod view;

#[cfg(test)]
mod test_utils;
