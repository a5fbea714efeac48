//! Common types shared across tools for type safety without dependencies

use serde_json::Value;

/// Flattened JSON-LD array of schema.org objects.
pub type Jsonld = Vec<Value>;

/// Metadata key-value pairs from `<meta>`/`<title>` tags, in document order.
pub type Metadata = Vec<(String, String)>;
