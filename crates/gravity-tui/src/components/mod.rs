pub mod date_field;
pub mod spinner;

pub use date_field::DateField;
pub use spinner::Spinner;
