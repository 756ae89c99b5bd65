pub(crate) mod blend;
pub(crate) mod canvas;
pub(crate) mod compositor;
pub(crate) mod config;
pub(crate) mod crop;
pub(crate) mod layout;
