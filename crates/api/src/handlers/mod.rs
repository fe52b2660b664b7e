pub mod alimtalk;
pub mod clients;
pub mod confirm;
pub mod manuscripts;
pub mod rewrite;
pub mod templates;
