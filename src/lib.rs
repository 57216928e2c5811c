pub mod core;
pub mod engine;
pub mod game;
pub mod logic;
pub mod player;

mod logic_tests;
