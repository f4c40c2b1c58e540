/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
[UPDATE]: Accept ARID both as a bare id and as a {id, text} list item
*/

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// FLAGS bit set on an expense once it has been reversed
pub const ASM_REVERSED: u64 = 1 << 2;

/// Date format used by the web services for date-only values
const WIRE_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Format a date the way the RentRoll services expect it (`M/D/YYYY`)
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// Parse a date returned by (or typed for) the RentRoll services
///
/// Accepts `M/D/YYYY`, `YYYY-MM-DD` and full RFC 3339 timestamps.
pub fn parse_wire_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.date_naive())
        })
}

/// Expense FLAGS bitfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseFlags(pub u64);

impl ExpenseFlags {
    pub const REVERSED: ExpenseFlags = ExpenseFlags(ASM_REVERSED);

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn contains(self, other: ExpenseFlags) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ExpenseFlags) {
        self.0 |= other.0;
    }

    pub fn is_reversed(self) -> bool {
        self.contains(Self::REVERSED)
    }
}

/// One expense line as exchanged with `/v1/expense`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Grid row id
    #[serde(default)]
    pub recid: i64,
    /// Server id, 0 until the record has been saved
    #[serde(rename = "EXPID", default)]
    pub expid: i64,
    /// Parent expense of a repeating series
    #[serde(rename = "PREXPID", default)]
    pub prexpid: i64,
    /// Account rule
    #[serde(
        rename = "ARID",
        default,
        deserialize_with = "serde_helpers::deserialize_list_id"
    )]
    pub arid: i64,
    /// Account rule display name
    #[serde(rename = "AcctRule", alias = "ARName", default)]
    pub acct_rule: String,
    #[serde(rename = "BID", default)]
    pub bid: i64,
    #[serde(
        rename = "BUD",
        default,
        deserialize_with = "serde_helpers::deserialize_list_text"
    )]
    pub bud: String,
    #[serde(rename = "RID", default)]
    pub rid: i64,
    #[serde(rename = "RAID", default)]
    pub raid: i64,
    #[serde(rename = "RName", default)]
    pub rname: String,
    #[serde(
        rename = "Amount",
        default,
        deserialize_with = "serde_helpers::deserialize_decimal_or_zero",
        serialize_with = "serde_helpers::serialize_decimal_number"
    )]
    pub amount: Decimal,
    #[serde(rename = "Dt", with = "serde_helpers::wire_date")]
    pub dt: NaiveDate,
    #[serde(rename = "Comment", default)]
    pub comment: String,
    #[serde(rename = "LastModTime", default)]
    pub last_mod_time: String,
    #[serde(rename = "LastModBy", default)]
    pub last_mod_by: i64,
    #[serde(rename = "CreateTS", default)]
    pub create_ts: String,
    #[serde(rename = "CreateBy", default)]
    pub create_by: i64,
    #[serde(rename = "FLAGS", default)]
    pub flags: ExpenseFlags,
    #[serde(rename = "Mode", default)]
    pub mode: i64,
}

impl ExpenseRecord {
    /// Blank record used when the user asks for a new expense
    pub fn new_template(bid: i64, bud: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            recid: 0,
            expid: 0,
            prexpid: 0,
            arid: 0,
            acct_rule: String::new(),
            bid,
            bud: bud.into(),
            rid: 0,
            raid: 0,
            rname: String::new(),
            amount: Decimal::ZERO,
            dt: today,
            comment: String::new(),
            last_mod_time: String::new(),
            last_mod_by: 0,
            create_ts: String::new(),
            create_by: 0,
            flags: ExpenseFlags::default(),
            mode: 0,
        }
    }

    /// True until the server has assigned an EXPID
    pub fn is_new(&self) -> bool {
        self.expid == 0
    }

    pub fn is_reversed(&self) -> bool {
        self.flags.is_reversed()
    }
}

/// A single choice in a server-provided option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRuleOption {
    pub id: i64,
    pub text: String,
}

/// Expense account rules keyed by business unit designation (BUD)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseRules(pub BTreeMap<String, Vec<AccountRuleOption>>);

impl ExpenseRules {
    /// Options for one business unit; empty when the unit is unknown
    pub fn for_unit(&self, bud: &str) -> &[AccountRuleOption] {
        self.0.get(bud).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, bud: &str, arid: i64) -> Option<&AccountRuleOption> {
        self.for_unit(bud).iter().find(|option| option.id == arid)
    }
}

pub(crate) mod serde_helpers {
    use super::Decimal;
    use chrono::NaiveDate;
    use rust_decimal::prelude::ToPrimitive;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn deserialize_decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Decimal::ZERO);
        }

        if let Some(raw) = value.as_str() {
            if raw.trim().is_empty() {
                return Ok(Decimal::ZERO);
            }
            return Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom);
        }

        if value.is_number() {
            return Decimal::from_str(&value.to_string()).map_err(serde::de::Error::custom);
        }

        Err(serde::de::Error::custom("invalid decimal value"))
    }

    /// Money goes over the wire as a JSON number
    ///
    /// The service parses it into a float64, so precision is bounded there
    /// at roughly 15 significant digits. Local comparisons use the `Decimal`.
    pub fn serialize_decimal_number<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value.to_f64() {
            Some(number) => serializer.serialize_f64(number),
            None => Err(serde::ser::Error::custom("amount out of range")),
        }
    }

    /// List fields arrive either as a bare id or as `{id, text}`
    pub fn deserialize_list_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(0),
            Value::Number(number) => number
                .as_i64()
                .ok_or_else(|| serde::de::Error::custom("list id must be an integer")),
            Value::String(raw) if raw.trim().is_empty() => Ok(0),
            Value::String(raw) => raw.trim().parse().map_err(serde::de::Error::custom),
            Value::Object(map) => match map.get("id") {
                Some(Value::Number(number)) => number
                    .as_i64()
                    .ok_or_else(|| serde::de::Error::custom("list id must be an integer")),
                _ => Ok(0),
            },
            _ => Err(serde::de::Error::custom("invalid list id")),
        }
    }

    /// Same as [`deserialize_list_id`] for text-valued lists such as BUD
    pub fn deserialize_list_text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(raw) => Ok(raw),
            Value::Object(map) => Ok(map
                .get("text")
                .or_else(|| map.get("id"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()),
            _ => Err(serde::de::Error::custom("invalid list text")),
        }
    }

    pub mod wire_date {
        use super::*;

        pub fn serialize<S>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&super::super::format_wire_date(*value))
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = String::deserialize(deserializer)?;
            super::super::parse_wire_date(&raw)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn record_deserializes_server_payload() {
        let value = json!({
            "recid": 5,
            "EXPID": 5,
            "ARID": 3,
            "ARName": "Repairs",
            "BID": 1,
            "BUD": "REX",
            "RID": 0,
            "RAID": 0,
            "RName": "",
            "Amount": 100.25,
            "Dt": "3/1/2024",
            "Comment": "",
            "LastModTime": "2024-03-01T10:00:00Z",
            "LastModBy": 211,
            "CreateTS": "2024-03-01T10:00:00Z",
            "CreateBy": 211,
            "FLAGS": 0
        });

        let record: ExpenseRecord = serde_json::from_value(value).expect("record");

        assert_eq!(record.expid, 5);
        assert_eq!(record.arid, 3);
        assert_eq!(record.acct_rule, "Repairs");
        assert_eq!(record.amount, Decimal::new(10025, 2));
        assert_eq!(record.dt, date(2024, 3, 1));
        assert!(!record.is_new());
        assert!(!record.is_reversed());
    }

    #[test]
    fn list_fields_accept_item_objects() {
        let value = json!({
            "ARID": {"id": 9, "text": "Utilities"},
            "BUD": {"id": "REX", "text": "REX"},
            "Amount": "12.50",
            "Dt": "2024-02-29"
        });

        let record: ExpenseRecord = serde_json::from_value(value).expect("record");

        assert_eq!(record.arid, 9);
        assert_eq!(record.bud, "REX");
        assert_eq!(record.amount, Decimal::new(1250, 2));
        assert_eq!(record.dt, date(2024, 2, 29));
    }

    #[test]
    fn reversed_bit_is_detected() {
        let mut flags = ExpenseFlags(1);
        assert!(!flags.is_reversed());
        flags.insert(ExpenseFlags::REVERSED);
        assert!(flags.is_reversed());
        assert_eq!(flags.bits(), 1 | ASM_REVERSED);
    }

    #[test]
    fn wire_dates_are_unpadded() {
        assert_eq!(format_wire_date(date(2024, 3, 7)), "3/7/2024");
        assert_eq!(parse_wire_date("03/07/2024"), Some(date(2024, 3, 7)));
        assert_eq!(
            parse_wire_date("2024-03-07T00:00:00Z"),
            Some(date(2024, 3, 7))
        );
        assert_eq!(parse_wire_date("not a date"), None);
    }

    #[test]
    fn template_is_new_and_unflagged() {
        let record = ExpenseRecord::new_template(1, "REX", date(2024, 1, 2));
        assert!(record.is_new());
        assert!(!record.is_reversed());
        assert_eq!(record.amount, Decimal::ZERO);
        assert_eq!(record.bud, "REX");
    }

    #[test]
    fn rules_lookup_by_unit() {
        let rules: ExpenseRules = serde_json::from_value(json!({
            "REX": [{"id": 3, "text": "Repairs"}, {"id": 4, "text": "Utilities"}]
        }))
        .expect("rules");

        assert_eq!(rules.for_unit("REX").len(), 2);
        assert!(rules.for_unit("OTHER").is_empty());
        assert_eq!(rules.find("REX", 4).map(|o| o.text.as_str()), Some("Utilities"));
    }
}
