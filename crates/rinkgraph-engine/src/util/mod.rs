pub mod config;
pub mod demo;
pub mod games;
pub mod trail;
