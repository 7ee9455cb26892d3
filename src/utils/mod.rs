pub mod datetime;
pub mod theme;
pub mod theme_loader;
pub mod url;
