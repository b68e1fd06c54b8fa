pub(crate) mod camera;
pub(crate) mod drift;
pub(crate) mod framer;
