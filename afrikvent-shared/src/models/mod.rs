pub mod banner;
pub mod events;
