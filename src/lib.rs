pub mod editor;
pub mod graph_utils;
pub mod persistence;
pub mod remote;
pub mod sim;
