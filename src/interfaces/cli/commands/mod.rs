mod config_gen;
mod create;
mod delete;
mod list;
mod stats;

pub use config_gen::config_generate;
pub use create::create_code;
pub use delete::delete_code;
pub use list::list_codes;
pub use stats::show_stats;
