pub mod config;
pub mod element;
pub mod number;
pub mod toc;
