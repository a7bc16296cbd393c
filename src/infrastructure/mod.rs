// Infrastructure layer: adapters, file I/O, serde, eventing
pub mod event_ndjson;
pub mod folder_tree;
pub mod netscape_html;
pub mod report_json;
pub mod schema_validator;
pub mod union_find;
pub mod url_normalizer;
pub mod url_sanitizer;
