pub mod alphabet;
pub mod classifier;
pub mod curves;
pub mod errors;
pub mod filter;
pub mod fold;
pub mod output;
pub mod structs;
pub mod util;
pub mod validate;
