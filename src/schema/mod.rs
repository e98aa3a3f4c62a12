// src/schema/mod.rs

use std::{fmt, str::FromStr};

use crate::error::LoadError;

pub const TABLE_NAME: &str = "tweets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
}

impl ColumnType {
    pub fn sql(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Text,
    }
}

const fn integer(name: &'static str) -> Column {
    Column {
        name,
        ty: ColumnType::Integer,
    }
}

/// Base layout, in insert order. `external_author_id` holds up to 18 digits,
/// which fits SQLite's 64-bit integer.
const BASE_COLUMNS: &[Column] = &[
    integer("external_author_id"),
    text("author"),
    text("content"),
    text("region"),
    text("language"),
    text("publish_date"),
    integer("publish_time"),
    text("harvested_date"),
    integer("following"),
    integer("followers"),
    integer("updates"),
    text("post_type"),
    text("account_type"),
    integer("retweet"),
    text("account_category"),
    integer("new_june_2018"),
];

const EXTENDED_COLUMNS: &[Column] = &[
    integer("external_author_id"),
    text("author"),
    text("content"),
    text("region"),
    text("language"),
    text("publish_date"),
    integer("publish_time"),
    text("harvested_date"),
    integer("following"),
    integer("followers"),
    integer("updates"),
    text("post_type"),
    text("account_type"),
    integer("retweet"),
    text("account_category"),
    integer("new_june_2018"),
    integer("alt_external_id"),
    integer("tweet_id"),
    text("article_url"),
    text("tco_step1"),
];

/// (index name, column)
const BASE_INDEXES: &[(&str, &str)] = &[
    ("tweet_author", "author"),
    ("tweet_region", "region"),
    ("tweet_language", "language"),
    ("tweet_time", "publish_time"),
    ("tweet_account_type", "account_type"),
];

const EXTENDED_INDEXES: &[(&str, &str)] = &[
    ("tweet_author", "author"),
    ("tweet_region", "region"),
    ("tweet_language", "language"),
    ("tweet_time", "publish_time"),
    ("tweet_account_type", "account_type"),
    ("tweet_alt_external_id", "alt_external_id"),
    ("tweet_tweet_id", "tweet_id"),
];

/// Input headers every variant needs.
const BASE_INPUT_FIELDS: &[&str] = &[
    "external_author_id",
    "author",
    "content",
    "region",
    "language",
    "publish_date",
    "harvested_date",
    "following",
    "followers",
    "updates",
    "post_type",
    "account_type",
    "retweet",
    "account_category",
    "new_june_2018",
];

/// Input headers only the extended variant reads.
const EXTENDED_INPUT_FIELDS: &[&str] = &[
    "alt_external_id",
    "tweet_id",
    "article_url",
    "tco1_step1",
    "tco2_step1",
    "tco3_step1",
];

/// Which table layout a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    Base,
    /// Base plus ids and shortened URL columns.
    Extended,
}

impl SchemaVariant {
    pub fn columns(self) -> &'static [Column] {
        match self {
            SchemaVariant::Base => BASE_COLUMNS,
            SchemaVariant::Extended => EXTENDED_COLUMNS,
        }
    }

    pub fn indexes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            SchemaVariant::Base => BASE_INDEXES,
            SchemaVariant::Extended => EXTENDED_INDEXES,
        }
    }

    /// Headers an input file must carry for this variant.
    pub fn required_input_fields(self) -> impl Iterator<Item = &'static str> {
        let extra: &'static [&'static str] = match self {
            SchemaVariant::Base => &[],
            SchemaVariant::Extended => EXTENDED_INPUT_FIELDS,
        };
        BASE_INPUT_FIELDS.iter().chain(extra).copied()
    }

    /// Every header the reader understands, whatever the variant.
    pub fn is_known_input_field(name: &str) -> bool {
        BASE_INPUT_FIELDS.contains(&name) || EXTENDED_INPUT_FIELDS.contains(&name)
    }

    pub fn create_table_sql(self) -> String {
        let cols = self
            .columns()
            .iter()
            .map(|c| format!("    {} {}", c.name, c.ty.sql()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("CREATE TABLE {TABLE_NAME} (\n{cols}\n)")
    }

    pub fn create_index_sql(self) -> Vec<String> {
        self.indexes()
            .iter()
            .map(|(name, col)| format!("CREATE INDEX {name} ON {TABLE_NAME}( {col} )"))
            .collect()
    }

    pub fn insert_sql(self) -> String {
        let placeholders = vec!["?"; self.columns().len()].join(",");
        format!("INSERT INTO {TABLE_NAME} VALUES ({placeholders})")
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaVariant::Base => "base",
            SchemaVariant::Extended => "extended",
        })
    }
}

impl FromStr for SchemaVariant {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(SchemaVariant::Base),
            "extended" => Ok(SchemaVariant::Extended),
            other => Err(LoadError::Config(format!(
                "unknown schema variant {other:?} (expected base or extended)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_is_base_plus_four() {
        let base = SchemaVariant::Base.columns();
        let ext = SchemaVariant::Extended.columns();
        assert_eq!(base.len(), 16);
        assert_eq!(ext.len(), 20);
        assert_eq!(&ext[..base.len()], base);
        let tail: Vec<_> = ext[base.len()..].iter().map(|c| c.name).collect();
        assert_eq!(
            tail,
            ["alt_external_id", "tweet_id", "article_url", "tco_step1"]
        );
    }

    #[test]
    fn indexes_cover_expected_columns() {
        assert_eq!(SchemaVariant::Base.indexes().len(), 5);
        assert_eq!(SchemaVariant::Extended.indexes().len(), 7);
        for variant in [SchemaVariant::Base, SchemaVariant::Extended] {
            for (_, col) in variant.indexes() {
                assert!(variant.columns().iter().any(|c| c.name == *col));
            }
        }
    }

    #[test]
    fn insert_has_one_placeholder_per_column() {
        let sql = SchemaVariant::Extended.insert_sql();
        assert_eq!(sql.matches('?').count(), 20);
        assert!(sql.starts_with("INSERT INTO tweets VALUES ("));
    }

    #[test]
    fn create_table_lists_types() {
        let sql = SchemaVariant::Base.create_table_sql();
        assert!(sql.contains("external_author_id integer"));
        assert!(sql.contains("content text"));
        assert!(!sql.contains("tco_step1"));
    }

    #[test]
    fn required_fields_per_variant() {
        assert_eq!(SchemaVariant::Base.required_input_fields().count(), 15);
        assert_eq!(SchemaVariant::Extended.required_input_fields().count(), 21);
        assert!(SchemaVariant::is_known_input_field("tco2_step1"));
        assert!(!SchemaVariant::is_known_input_field("tco_step1"));
    }

    #[test]
    fn parses_variant_names() {
        assert_eq!("base".parse::<SchemaVariant>().unwrap(), SchemaVariant::Base);
        assert_eq!(
            " EXTENDED".parse::<SchemaVariant>().unwrap(),
            SchemaVariant::Extended
        );
        assert!("wide".parse::<SchemaVariant>().is_err());
    }
}
