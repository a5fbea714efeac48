// Shared types
pub mod types;

// Modular tools
pub mod clean;
pub mod context;
pub mod fetch;
pub mod images;
pub mod manuals;
pub mod scriptjson;
pub mod specs;
pub mod structured;
