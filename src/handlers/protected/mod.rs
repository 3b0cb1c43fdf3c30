pub mod form;
pub mod rooms;
