pub(crate) mod chapter_layout;
pub(crate) mod geometry;
