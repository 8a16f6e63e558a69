pub mod alert;
pub mod error;
pub mod health;
pub mod product;
pub mod settings;
pub mod theme;
pub mod toast;
