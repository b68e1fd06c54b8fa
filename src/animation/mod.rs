pub(crate) mod ease;
pub(crate) mod noise;
pub(crate) mod tween;
