/// Database connection and `document` table tests
pub mod document_tests;
