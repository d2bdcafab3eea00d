pub mod dates;
pub mod debounce;
