//! SQLite schema definitions
//!
//! Catalog tables (attributes, terms, products and their assignments) plus
//! the persisted widget instances.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Attributes
-- =============================================================================
CREATE TABLE IF NOT EXISTS attributes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK(length(name) >= 1 AND length(name) <= 64),
    label TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- =============================================================================
-- 2. Terms (references attributes)
-- =============================================================================
CREATE TABLE IF NOT EXISTS terms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    attribute_id INTEGER NOT NULL REFERENCES attributes(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    position INTEGER NOT NULL DEFAULT 0,
    UNIQUE(attribute_id, name)
);

CREATE INDEX IF NOT EXISTS idx_terms_attribute ON terms(attribute_id, position);

-- =============================================================================
-- 3. Products
-- =============================================================================
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(name) >= 1),
    created_at INTEGER NOT NULL
);

-- =============================================================================
-- 4. Product term assignments (references products + terms)
-- =============================================================================
CREATE TABLE IF NOT EXISTS product_terms (
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    term_id INTEGER NOT NULL REFERENCES terms(id) ON DELETE CASCADE,
    PRIMARY KEY (product_id, term_id)
);

CREATE INDEX IF NOT EXISTS idx_product_terms_term ON product_terms(term_id);

-- =============================================================================
-- 5. Slider widget instances
-- =============================================================================
CREATE TABLE IF NOT EXISTS widgets (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL CHECK(length(title) <= 200),
    attribute_name TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;
