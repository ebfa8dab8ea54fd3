mod code_store_tests;
mod service_tests;
mod sweeper_tests;
