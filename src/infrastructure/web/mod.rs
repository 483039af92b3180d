pub mod cors;
pub mod flash;
pub mod form;
pub mod views;
