pub mod complete_file;
pub mod error;
pub mod extract_format;
pub mod find_length;
pub mod get_args;
pub mod sort_alleles;
pub mod struct_helper;
