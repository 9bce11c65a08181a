pub mod body;
pub mod extract;
