pub mod extract;
pub mod version;
