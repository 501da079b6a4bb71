//! Command implementations.

pub mod batch;
pub mod query;
pub mod schema;
pub mod status;
pub mod suggest;
pub mod templates;

pub use self::batch::execute_batch;
pub use self::query::execute_query;
pub use self::schema::execute_schema;
pub use self::status::execute_status;
pub use self::suggest::execute_suggest;
pub use self::templates::execute_templates;
