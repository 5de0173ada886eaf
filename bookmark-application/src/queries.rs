pub mod entry_queries;
