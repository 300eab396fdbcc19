mod versioned_schema;

pub use versioned_schema::{
    create_or_migrate, Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
    BASE_DB_VERSION, DEFAULT_TIMESTAMP,
};
