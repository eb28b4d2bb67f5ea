pub mod detect;
pub mod dump;
