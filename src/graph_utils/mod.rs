pub mod connect;
pub mod graph;
pub mod ids;
