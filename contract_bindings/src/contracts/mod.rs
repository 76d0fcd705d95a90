pub mod counter;
pub mod hello_world;
