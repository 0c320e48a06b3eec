//! Movement domain: system modules for locomotion updates.

pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod locomotion;

pub(crate) use collisions::sense_environment;
pub(crate) use input::read_input;
pub(crate) use locomotion::apply_locomotion;
