pub mod get_args;
