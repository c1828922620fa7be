pub mod codec;
pub mod document;
pub mod events;
pub mod fill;
pub mod grid_ops;
pub mod history;
pub mod layout;
pub mod paste;
pub mod search;
pub mod session;
