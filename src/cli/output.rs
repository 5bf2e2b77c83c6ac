pub use marksrank_core::format::OutputFormat;
