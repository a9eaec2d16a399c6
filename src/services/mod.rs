pub mod animation_service;
pub mod history_service;
