pub mod cpu;
pub mod engine;
pub mod graph;
pub mod synth;
