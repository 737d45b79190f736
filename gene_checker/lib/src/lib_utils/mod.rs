pub mod block;
pub mod driver;
pub mod error;
pub mod output;
pub mod record;
pub mod resolver;
pub mod struct_helper;
