// Configuration loading

pub mod layout;
pub mod settings;
