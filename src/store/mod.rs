pub(crate) mod artifact;
pub(crate) mod directory;
pub(crate) mod memory;
pub(crate) mod sink;
