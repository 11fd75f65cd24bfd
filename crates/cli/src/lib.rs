// gridkit CLI library: script replay and output rendering

pub mod render;
pub mod script;
