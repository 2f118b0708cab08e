//! Catalog - schema metadata (tables, columns)
//!
//! The catalog stores table definitions and declared column types. The
//! clause rewriter consults it to answer two questions about a requested
//! field: does the column exist, and is its declared type numeric.

use std::collections::HashMap;
use std::fmt;

/// SQL data types tracked by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// Boolean (true/false)
    Boolean,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 24-bit signed integer
    MediumInt,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    BigInt,
    /// Fixed-point decimal
    Decimal,
    /// Fixed-point numeric (alias family of DECIMAL)
    Numeric,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Bit field
    Bit,
    /// REAL floating point
    Real,
    /// Variable-length string with max length
    Varchar(u32),
    /// Unlimited text
    Text,
    /// Binary data
    Blob,
    /// Timestamp (date and time)
    Timestamp,
}

impl DataType {
    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt
                | DataType::SmallInt
                | DataType::MediumInt
                | DataType::Int
                | DataType::BigInt
                | DataType::Decimal
                | DataType::Numeric
                | DataType::Float
                | DataType::Double
                | DataType::Bit
                | DataType::Real
        )
    }

    /// Check if this type is an integer
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::TinyInt
                | DataType::SmallInt
                | DataType::MediumInt
                | DataType::Int
                | DataType::BigInt
        )
    }

    /// Check if this type is a string type
    pub fn is_string(&self) -> bool {
        matches!(self, DataType::Varchar(_) | DataType::Text)
    }

    /// Parse a declared SQL type name, case-insensitively.
    ///
    /// Accepts an optional parenthesized length/precision suffix, e.g.
    /// `decimal(10,2)` or `VARCHAR(255)`.
    pub fn from_sql_name(name: &str) -> Option<DataType> {
        let name = name.trim();
        let (base, args) = match name.split_once('(') {
            Some((base, rest)) => (base.trim(), Some(rest.trim_end_matches(')'))),
            None => (name, None),
        };
        let data_type = match base.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => DataType::Boolean,
            "tinyint" => DataType::TinyInt,
            "smallint" => DataType::SmallInt,
            "mediumint" => DataType::MediumInt,
            "int" | "integer" => DataType::Int,
            "bigint" => DataType::BigInt,
            "decimal" => DataType::Decimal,
            "numeric" => DataType::Numeric,
            "float" => DataType::Float,
            "double" => DataType::Double,
            "bit" => DataType::Bit,
            "real" => DataType::Real,
            "varchar" => {
                let len = args
                    .and_then(|a| a.split(',').next())
                    .and_then(|a| a.trim().parse().ok())
                    .unwrap_or(255);
                DataType::Varchar(len)
            }
            "text" => DataType::Text,
            "blob" => DataType::Blob,
            "timestamp" | "datetime" => DataType::Timestamp,
            _ => return None,
        };
        Some(data_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "boolean"),
            DataType::TinyInt => write!(f, "tinyint"),
            DataType::SmallInt => write!(f, "smallint"),
            DataType::MediumInt => write!(f, "mediumint"),
            DataType::Int => write!(f, "int"),
            DataType::BigInt => write!(f, "bigint"),
            DataType::Decimal => write!(f, "decimal"),
            DataType::Numeric => write!(f, "numeric"),
            DataType::Float => write!(f, "float"),
            DataType::Double => write!(f, "double"),
            DataType::Bit => write!(f, "bit"),
            DataType::Real => write!(f, "real"),
            DataType::Varchar(len) => write!(f, "varchar({})", len),
            DataType::Text => write!(f, "text"),
            DataType::Blob => write!(f, "blob"),
            DataType::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Declared data type
    pub data_type: DataType,
    /// Whether NULL values are allowed
    pub nullable: bool,
    /// Default value expression (as string)
    pub default: Option<String>,
}

impl ColumnDef {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
        }
    }

    /// Set nullable
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set default value
    #[must_use]
    pub fn default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Table definition
#[derive(Debug, Clone)]
pub struct TableDef {
    /// Table name
    pub name: String,
    /// Column definitions
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column
    #[must_use]
    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column index by name
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Check if a column exists
    pub fn column_exists(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Get a column's declared type
    pub fn column_type(&self, name: &str) -> Option<&DataType> {
        self.get_column(name).map(|c| &c.data_type)
    }
}

/// Catalog error
#[derive(Debug, Clone)]
pub enum CatalogError {
    /// Table already exists
    TableExists(String),
    /// Table not found
    TableNotFound(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::TableExists(name) => write!(f, "Table '{}' already exists", name),
            CatalogError::TableNotFound(name) => write!(f, "Table '{}' not found", name),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Database catalog - stores schema metadata
#[derive(Debug, Default)]
pub struct Catalog {
    /// Tables by name
    tables: HashMap<String, TableDef>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Create a table
    pub fn create_table(&mut self, def: TableDef) -> CatalogResult<()> {
        if self.tables.contains_key(&def.name) {
            return Err(CatalogError::TableExists(def.name.clone()));
        }
        self.tables.insert(def.name.clone(), def);
        Ok(())
    }

    /// Drop a table
    pub fn drop_table(&mut self, name: &str) -> CatalogResult<()> {
        if self.tables.remove(name).is_none() {
            return Err(CatalogError::TableNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Get a table definition
    pub fn get_table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// List all table names
    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }
}
