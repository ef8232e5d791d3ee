pub mod api;
pub mod cli;
pub mod controller;
pub mod core;
pub mod gateway;
pub mod openai;
pub mod transcript;
