pub(crate) mod encode;
pub(crate) mod validate;
