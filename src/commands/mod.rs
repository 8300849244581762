pub mod archive_name;
pub mod receipt;
