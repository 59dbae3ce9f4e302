pub mod catalog;
pub mod layout;
pub mod schema;
pub mod table_store;
pub mod tuple_group;
pub mod tuple_list;
