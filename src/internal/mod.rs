pub mod feed;
pub mod models;
pub mod notification;
pub mod preferences;
pub mod theme_service;
pub mod ui;
