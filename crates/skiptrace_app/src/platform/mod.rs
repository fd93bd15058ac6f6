pub mod app;
mod dispatch;
mod effects;
pub mod headless;
mod ui;
