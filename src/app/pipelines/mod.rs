pub mod import_pipeline;
