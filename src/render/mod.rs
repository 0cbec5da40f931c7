pub(crate) mod background;
pub(crate) mod cpu;
pub(crate) mod engine;
pub(crate) mod recording;
pub(crate) mod surface;
