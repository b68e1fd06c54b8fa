pub(crate) mod backend;
pub(crate) mod mixer;
pub(crate) mod timers;
