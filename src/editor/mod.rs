pub mod cascade;
pub mod engine;
pub mod selection;
pub mod sync;
