//! Bot commands built on the interactive UI framework

pub mod fishbase;
pub mod help;
pub mod html;
pub mod liveaquaria;
pub mod maths;

#[cfg(test)]
mod tests;
