pub mod alimtalk_log;
pub mod client;
pub mod manuscript;
pub mod template;
