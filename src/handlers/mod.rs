// handlers/mod.rs
//
// root     - GET /, GET /health and the JSON 404 fallback
// resource - the five CRUD handlers, generic over the resource
pub mod resource;
pub mod root;
