pub mod extract;
pub mod info;
pub mod preview;
