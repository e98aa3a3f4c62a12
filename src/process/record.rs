use std::fmt;

use rusqlite::ToSql;
use serde::Deserialize;

use crate::config::LoadConfig;
use crate::error::Result;
use crate::process::date_parser::{convert_date, reformat_date};
use crate::process::urls::{combine_tco, shorten_url_prefix};
use crate::schema::SchemaVariant;

/// One CSV row, typed. Empty integer cells deserialise to `None`; the
/// extended-only fields default when their header is absent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputRecord {
    pub external_author_id: Option<i64>,
    pub author: String,
    pub content: String,
    pub region: String,
    pub language: String,
    pub publish_date: String,
    pub harvested_date: String,
    pub following: Option<i64>,
    pub followers: Option<i64>,
    pub updates: Option<i64>,
    pub post_type: String,
    pub account_type: String,
    pub retweet: Option<i64>,
    pub account_category: String,
    pub new_june_2018: Option<i64>,

    #[serde(default)]
    pub alt_external_id: Option<i64>,
    #[serde(default)]
    pub tweet_id: Option<i64>,
    #[serde(default)]
    pub article_url: String,
    #[serde(default)]
    pub tco1_step1: String,
    #[serde(default)]
    pub tco2_step1: String,
    #[serde(default)]
    pub tco3_step1: String,
}

/// Columns only the extended layout carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedColumns {
    pub alt_external_id: Option<i64>,
    pub tweet_id: Option<i64>,
    pub article_url: String,
    pub tco_step1: String,
}

/// A fully transformed row, ready to bind against [`SchemaVariant::insert_sql`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub external_author_id: Option<i64>,
    pub author: String,
    pub content: String,
    pub region: String,
    pub language: String,
    pub publish_date: String,
    pub publish_time: i64,
    pub harvested_date: String,
    pub following: Option<i64>,
    pub followers: Option<i64>,
    pub updates: Option<i64>,
    pub post_type: String,
    pub account_type: String,
    pub retweet: Option<i64>,
    pub account_category: String,
    pub new_june_2018: Option<i64>,
    pub extended: Option<ExtendedColumns>,
}

fn maybe_shorten(url: String, cfg: &LoadConfig) -> String {
    if cfg.url_shortening.is_enabled() {
        shorten_url_prefix(&url).into_owned()
    } else {
        url
    }
}

impl OutputRow {
    /// Apply the per-record transforms: URLs (extended only), then
    /// `publish_date`/`publish_time`, then `harvested_date`.
    pub fn from_input(rec: InputRecord, cfg: &LoadConfig) -> Result<Self> {
        let extended = match cfg.schema {
            SchemaVariant::Base => None,
            SchemaVariant::Extended => {
                let tco = [rec.tco1_step1, rec.tco2_step1, rec.tco3_step1]
                    .map(|url| maybe_shorten(url, cfg));
                Some(ExtendedColumns {
                    alt_external_id: rec.alt_external_id,
                    tweet_id: rec.tweet_id,
                    article_url: maybe_shorten(rec.article_url, cfg),
                    tco_step1: combine_tco(&tco),
                })
            }
        };

        let (publish_date, publish_time) = convert_date(&rec.publish_date, cfg.tz_offset_hours)?;
        let harvested_date = reformat_date(&rec.harvested_date)?;

        Ok(Self {
            external_author_id: rec.external_author_id,
            author: rec.author,
            content: rec.content,
            region: rec.region,
            language: rec.language,
            publish_date,
            publish_time,
            harvested_date,
            following: rec.following,
            followers: rec.followers,
            updates: rec.updates,
            post_type: rec.post_type,
            account_type: rec.account_type,
            retweet: rec.retweet,
            account_category: rec.account_category,
            new_june_2018: rec.new_june_2018,
            extended,
        })
    }

    /// Bind parameters in schema column order.
    pub fn params(&self) -> Vec<&dyn ToSql> {
        let mut out: Vec<&dyn ToSql> = vec![
            &self.external_author_id,
            &self.author,
            &self.content,
            &self.region,
            &self.language,
            &self.publish_date,
            &self.publish_time,
            &self.harvested_date,
            &self.following,
            &self.followers,
            &self.updates,
            &self.post_type,
            &self.account_type,
            &self.retweet,
            &self.account_category,
            &self.new_june_2018,
        ];
        if let Some(ext) = &self.extended {
            out.extend([
                &ext.alt_external_id as &dyn ToSql,
                &ext.tweet_id,
                &ext.article_url,
                &ext.tco_step1,
            ]);
        }
        out
    }
}

fn opt(v: &Option<i64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

/// Full field list as `[a, b, ...]`, for failure diagnostics.
impl fmt::Display for OutputRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = vec![
            opt(&self.external_author_id),
            format!("{:?}", self.author),
            format!("{:?}", self.content),
            format!("{:?}", self.region),
            format!("{:?}", self.language),
            format!("{:?}", self.publish_date),
            self.publish_time.to_string(),
            format!("{:?}", self.harvested_date),
            opt(&self.following),
            opt(&self.followers),
            opt(&self.updates),
            format!("{:?}", self.post_type),
            format!("{:?}", self.account_type),
            opt(&self.retweet),
            format!("{:?}", self.account_category),
            opt(&self.new_june_2018),
        ];
        if let Some(ext) = &self.extended {
            fields.push(opt(&ext.alt_external_id));
            fields.push(opt(&ext.tweet_id));
            fields.push(format!("{:?}", ext.article_url));
            fields.push(format!("{:?}", ext.tco_step1));
        }
        write!(f, "[{}]", fields.join(", "))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::UrlShortening;
    use crate::error::LoadError;

    pub(crate) fn sample_input() -> InputRecord {
        InputRecord {
            external_author_id: Some(906_000_000_000_000_000),
            author: "10_GOP".into(),
            content: "héllo wörld".into(),
            region: "Unknown".into(),
            language: "English".into(),
            publish_date: "1/2/2020 5:30".into(),
            harvested_date: "1/2/2020 6:00".into(),
            following: Some(1052),
            followers: Some(9636),
            updates: Some(253),
            post_type: String::new(),
            account_type: "Right".into(),
            retweet: Some(0),
            account_category: "RightTroll".into(),
            new_june_2018: Some(0),
            alt_external_id: Some(905_874_659_358_453_760),
            tweet_id: Some(914_580_356_430_536_707),
            article_url: "https://twitter.com/foo".into(),
            tco1_step1: "http://bit.ly/x".into(),
            tco2_step1: String::new(),
            tco3_step1: String::new(),
        }
    }

    fn config(schema: SchemaVariant, url_shortening: UrlShortening) -> LoadConfig {
        LoadConfig {
            schema,
            url_shortening,
            ..LoadConfig::default()
        }
    }

    #[test]
    fn extended_row_is_transformed() {
        let cfg = config(SchemaVariant::Extended, UrlShortening::Enabled);
        let row = OutputRow::from_input(sample_input(), &cfg).unwrap();
        assert_eq!(row.publish_date, "2020/01/02 05:30");
        assert_eq!(row.publish_time, 1_577_943_000);
        assert_eq!(row.harvested_date, "2020/01/02 06:00");
        let ext = row.extended.as_ref().unwrap();
        assert_eq!(ext.article_url, "@T/foo");
        assert_eq!(ext.tco_step1, "@h/bit.ly/x");
        assert_eq!(row.params().len(), SchemaVariant::Extended.columns().len());
    }

    #[test]
    fn disabled_shortening_keeps_urls() {
        let mut input = sample_input();
        input.tco3_step1 = "https://t.co/z".into();
        let cfg = config(SchemaVariant::Extended, UrlShortening::Disabled);
        let row = OutputRow::from_input(input, &cfg).unwrap();
        let ext = row.extended.unwrap();
        assert_eq!(ext.article_url, "https://twitter.com/foo");
        assert_eq!(ext.tco_step1, "http://bit.ly/x https://t.co/z");
    }

    #[test]
    fn base_row_has_no_url_columns() {
        let cfg = config(SchemaVariant::Base, UrlShortening::Enabled);
        let row = OutputRow::from_input(sample_input(), &cfg).unwrap();
        assert!(row.extended.is_none());
        assert_eq!(row.params().len(), SchemaVariant::Base.columns().len());
    }

    #[test]
    fn bad_harvested_date_fails_whole_record() {
        let mut input = sample_input();
        input.harvested_date = "yesterday".into();
        let err = OutputRow::from_input(input, &LoadConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedTimestamp { text } if text == "yesterday"));
    }

    #[test]
    fn display_lists_every_field() {
        let cfg = config(SchemaVariant::Extended, UrlShortening::Enabled);
        let mut row = OutputRow::from_input(sample_input(), &cfg).unwrap();
        row.following = None;
        let shown = row.to_string();
        assert!(shown.starts_with("[906000000000000000, \"10_GOP\""));
        assert!(shown.ends_with("\"@T/foo\", \"@h/bit.ly/x\"]"));
        assert_eq!(shown.matches(", ").count() + 1, 20);
    }
}
