pub(crate) mod config;
pub(crate) mod gradients;
pub(crate) mod presets;
