pub mod cpu;
pub mod frame;
pub mod renderer;
pub mod surface;
