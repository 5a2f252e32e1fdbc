//! Value-diff helpers
//!
//! Membership tests, appends and removals on a [`RecordValues`] collection,
//! written once against the Record Value Model so every adapter shares them.
//!
//! Comparison keys per type:
//!
//! | Type | Key |
//! |------|-----|
//! | A, AAAA, NS, PTR, CNAME, TXT | the string value |
//! | MX | exchange, plus preference when the caller supplied a priority |
//! | SRV | target, plus priority/weight/port (all required on set, optional on delete) |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{DesiredState, MxValue, RecordType, RecordValues, SrvValue, TxtBucket};

/// MX preference used when the caller supplies no priority
pub const DEFAULT_MX_PREFERENCE: u16 = 10;

/// How record values are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueComparison {
    /// Byte-for-byte equality
    #[default]
    Exact,
    /// ASCII case-insensitive equality
    IgnoreAsciiCase,
}

impl ValueComparison {
    pub fn matches(&self, a: &str, b: &str) -> bool {
        match self {
            ValueComparison::Exact => a == b,
            ValueComparison::IgnoreAsciiCase => a.eq_ignore_ascii_case(b),
        }
    }
}

/// Result of removing a value from a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Something was removed and values remain
    Removed,
    /// Nothing matched
    NotFound,
    /// The whole record set must be deleted
    WholeSet,
}

fn required_value(desired: &DesiredState) -> Result<&str> {
    desired
        .value
        .as_deref()
        .ok_or_else(|| Error::invalid_argument("A value is required to set a record"))
}

fn srv_from_desired(desired: &DesiredState, target: &str) -> Result<SrvValue> {
    match (desired.priority, desired.weight, desired.port) {
        (Some(priority), Some(weight), Some(port)) => Ok(SrvValue {
            priority,
            weight,
            port,
            target: target.to_string(),
        }),
        _ => Err(Error::invalid_argument(
            "SRV records require priority, weight and port",
        )),
    }
}

fn unsupported(record_type: RecordType) -> Error {
    Error::not_implemented(format!("{record_type} records are not implemented"))
}

/// Build the value collection for a record set that does not exist yet
pub fn initial_values(record_type: RecordType, desired: &DesiredState) -> Result<RecordValues> {
    let value = required_value(desired)?;

    let values = match record_type {
        RecordType::A => RecordValues::A(vec![value.to_string()]),
        RecordType::Aaaa => RecordValues::Aaaa(vec![value.to_string()]),
        RecordType::Cname => RecordValues::Cname(value.to_string()),
        RecordType::Mx => RecordValues::Mx(vec![MxValue {
            preference: desired.priority.unwrap_or(DEFAULT_MX_PREFERENCE),
            exchange: value.to_string(),
        }]),
        RecordType::Ns => RecordValues::Ns(vec![value.to_string()]),
        RecordType::Ptr => RecordValues::Ptr(vec![value.to_string()]),
        RecordType::Srv => RecordValues::Srv(vec![srv_from_desired(desired, value)?]),
        RecordType::Txt => RecordValues::Txt(vec![TxtBucket::new([value])]),
        RecordType::Caa | RecordType::Soa => return Err(unsupported(record_type)),
    };

    Ok(values)
}

fn append_scalar(list: &mut Vec<String>, value: &str, cmp: ValueComparison) -> bool {
    if list.iter().any(|existing| cmp.matches(existing, value)) {
        return false;
    }
    list.push(value.to_string());
    true
}

/// Merge the desired value into an existing collection
///
/// Returns `true` if the collection changed. List types append when the
/// value is missing; CNAME replaces its single value.
pub fn merge(
    values: &mut RecordValues,
    desired: &DesiredState,
    cmp: ValueComparison,
) -> Result<bool> {
    let value = required_value(desired)?;
    let record_type = values.record_type();

    let changed = match values {
        RecordValues::A(list)
        | RecordValues::Aaaa(list)
        | RecordValues::Ns(list)
        | RecordValues::Ptr(list) => append_scalar(list, value, cmp),
        RecordValues::Cname(current) => {
            if cmp.matches(current, value) {
                false
            } else {
                *current = value.to_string();
                true
            }
        }
        RecordValues::Mx(list) => {
            let present = list.iter().any(|mx| {
                cmp.matches(&mx.exchange, value)
                    && desired.priority.is_none_or(|p| p == mx.preference)
            });
            if present {
                false
            } else {
                list.push(MxValue {
                    preference: desired.priority.unwrap_or(DEFAULT_MX_PREFERENCE),
                    exchange: value.to_string(),
                });
                true
            }
        }
        RecordValues::Srv(list) => {
            let wanted = srv_from_desired(desired, value)?;
            let present = list.iter().any(|srv| {
                srv.priority == wanted.priority
                    && srv.weight == wanted.weight
                    && srv.port == wanted.port
                    && cmp.matches(&srv.target, &wanted.target)
            });
            if present {
                false
            } else {
                list.push(wanted);
                true
            }
        }
        RecordValues::Txt(buckets) => {
            let present = buckets
                .iter()
                .flat_map(|b| b.values.iter())
                .any(|existing| cmp.matches(existing, value));
            if present {
                false
            } else {
                match buckets.first_mut() {
                    Some(bucket) => bucket.values.push(value.to_string()),
                    None => buckets.push(TxtBucket::new([value])),
                }
                true
            }
        }
        RecordValues::Caa(_) | RecordValues::Soa(_) => return Err(unsupported(record_type)),
    };

    Ok(changed)
}

fn retain_counting<T>(list: &mut Vec<T>, keep: impl FnMut(&T) -> bool) -> bool {
    let before = list.len();
    list.retain(keep);
    list.len() != before
}

/// Remove `value` (and the caller's MX/SRV qualifiers) from a collection
///
/// Empty collections are never left behind: when a removal empties the
/// record set, or a TXT record set is left without buckets, the result is
/// [`Removal::WholeSet`]. A value-targeted CNAME delete always removes the
/// whole record set.
pub fn remove(
    values: &mut RecordValues,
    desired: &DesiredState,
    value: &str,
    cmp: ValueComparison,
) -> Result<Removal> {
    let record_type = values.record_type();

    let removed = match values {
        RecordValues::A(list)
        | RecordValues::Aaaa(list)
        | RecordValues::Ns(list)
        | RecordValues::Ptr(list) => {
            retain_counting(list, |existing| !cmp.matches(existing, value))
        }
        RecordValues::Cname(_) => return Ok(Removal::WholeSet),
        RecordValues::Mx(list) => retain_counting(list, |mx| {
            !(cmp.matches(&mx.exchange, value)
                && desired.priority.is_none_or(|p| p == mx.preference))
        }),
        RecordValues::Srv(list) => retain_counting(list, |srv| {
            !(cmp.matches(&srv.target, value)
                && desired.priority.is_none_or(|p| p == srv.priority)
                && desired.weight.is_none_or(|w| w == srv.weight)
                && desired.port.is_none_or(|p| p == srv.port))
        }),
        RecordValues::Txt(buckets) => {
            let mut removed = false;
            for bucket in buckets.iter_mut() {
                removed |= retain_counting(&mut bucket.values, |existing| {
                    !cmp.matches(existing, value)
                });
            }

            // An empty bucket is never persisted
            buckets.retain(|bucket| !bucket.values.is_empty());

            if buckets.is_empty() {
                return Ok(Removal::WholeSet);
            }
            removed
        }
        RecordValues::Caa(_) | RecordValues::Soa(_) => return Err(unsupported(record_type)),
    };

    Ok(match (removed, values.is_empty()) {
        (false, _) => Removal::NotFound,
        (true, true) => Removal::WholeSet,
        (true, false) => Removal::Removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXACT: ValueComparison = ValueComparison::Exact;

    fn desired(record_type: &str, value: &str) -> DesiredState {
        DesiredState::new("example.com", "rec", record_type).with_value(value)
    }

    fn txt(buckets: &[&[&str]]) -> RecordValues {
        RecordValues::Txt(buckets.iter().map(|b| TxtBucket::new(b.iter().copied())).collect())
    }

    #[test]
    fn test_comparison_modes() {
        assert!(ValueComparison::Exact.matches("a.example.com", "a.example.com"));
        assert!(!ValueComparison::Exact.matches("A.example.com", "a.example.com"));
        assert!(ValueComparison::IgnoreAsciiCase.matches("A.Example.com", "a.example.com"));
    }

    #[test]
    fn test_initial_values_require_value() {
        let bare = DesiredState::new("example.com", "rec", "A");
        assert!(matches!(
            initial_values(RecordType::A, &bare),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_initial_values_reject_caa_and_soa() {
        for rt in [RecordType::Caa, RecordType::Soa] {
            let err = initial_values(rt, &desired(rt.as_str(), "x")).unwrap_err();
            assert!(matches!(err, Error::NotImplemented(_)));
        }
    }

    #[test]
    fn test_initial_mx_defaults_preference() {
        let values = initial_values(RecordType::Mx, &desired("MX", "mx.example.com")).unwrap();
        assert_eq!(values.flatten(), vec!["10 mx.example.com"]);
    }

    #[test]
    fn test_initial_srv_requires_all_fields() {
        let partial = desired("SRV", "sip.example.com").with_priority(1);
        assert!(matches!(
            initial_values(RecordType::Srv, &partial),
            Err(Error::InvalidArgument(_))
        ));

        let full = partial.with_weight(5).with_port(5060);
        let values = initial_values(RecordType::Srv, &full).unwrap();
        assert_eq!(values.flatten(), vec!["1 5 5060 sip.example.com"]);
    }

    #[test]
    fn test_merge_appends_missing_scalar_once() {
        let mut values = RecordValues::A(vec!["1.1.1.1".to_string()]);
        let d = desired("A", "2.2.2.2");

        assert!(merge(&mut values, &d, EXACT).unwrap());
        assert!(!merge(&mut values, &d, EXACT).unwrap());
        assert_eq!(values.flatten(), vec!["1.1.1.1", "2.2.2.2"]);
    }

    #[test]
    fn test_merge_cname_replaces() {
        let mut values = RecordValues::Cname("old.example.com".to_string());
        assert!(merge(&mut values, &desired("CNAME", "new.example.com"), EXACT).unwrap());
        assert_eq!(values, RecordValues::Cname("new.example.com".to_string()));
    }

    #[test]
    fn test_merge_respects_case_insensitive_comparison() {
        let mut values = RecordValues::Cname("Target.Example.com".to_string());
        let d = desired("CNAME", "target.example.com");
        assert!(!merge(&mut values, &d, ValueComparison::IgnoreAsciiCase).unwrap());
        assert!(merge(&mut values, &d, EXACT).unwrap());
    }

    #[test]
    fn test_merge_mx_key_includes_priority_only_when_supplied() {
        let mut values = RecordValues::Mx(vec![MxValue {
            preference: 10,
            exchange: "mx.example.com".to_string(),
        }]);

        // No priority: exchange alone disambiguates
        assert!(!merge(&mut values, &desired("MX", "mx.example.com"), EXACT).unwrap());

        // Same priority: present
        let same = desired("MX", "mx.example.com").with_priority(10);
        assert!(!merge(&mut values, &same, EXACT).unwrap());

        // Different priority: new tuple
        let other = desired("MX", "mx.example.com").with_priority(20);
        assert!(merge(&mut values, &other, EXACT).unwrap());
        assert_eq!(values.flatten(), vec!["10 mx.example.com", "20 mx.example.com"]);
    }

    #[test]
    fn test_merge_txt_checks_union_and_appends_to_first_bucket() {
        let mut values = txt(&[&["a"], &["b"]]);

        assert!(!merge(&mut values, &desired("TXT", "b"), EXACT).unwrap());
        assert!(merge(&mut values, &desired("TXT", "c"), EXACT).unwrap());
        assert_eq!(values, txt(&[&["a", "c"], &["b"]]));
    }

    #[test]
    fn test_merge_txt_into_bucketless_set() {
        let mut values = txt(&[]);
        assert!(merge(&mut values, &desired("TXT", "a"), EXACT).unwrap());
        assert_eq!(values, txt(&[&["a"]]));
    }

    #[test]
    fn test_remove_scalar() {
        let mut values = RecordValues::Ns(vec!["ns1".to_string(), "ns2".to_string()]);
        let d = desired("NS", "ns1");

        assert_eq!(remove(&mut values, &d, "ns1", EXACT).unwrap(), Removal::Removed);
        assert_eq!(values.flatten(), vec!["ns2"]);
        assert_eq!(remove(&mut values, &d, "ns1", EXACT).unwrap(), Removal::NotFound);
    }

    #[test]
    fn test_remove_last_scalar_deletes_whole_set() {
        let mut values = RecordValues::A(vec!["1.1.1.1".to_string()]);
        let d = desired("A", "1.1.1.1");
        assert_eq!(remove(&mut values, &d, "1.1.1.1", EXACT).unwrap(), Removal::WholeSet);
    }

    #[test]
    fn test_remove_cname_always_whole_set() {
        let mut values = RecordValues::Cname("target".to_string());
        let d = desired("CNAME", "anything");
        assert_eq!(remove(&mut values, &d, "anything", EXACT).unwrap(), Removal::WholeSet);
    }

    #[test]
    fn test_remove_mx_matches_priority_when_supplied() {
        let mut values = RecordValues::Mx(vec![
            MxValue { preference: 10, exchange: "mx".to_string() },
            MxValue { preference: 20, exchange: "mx".to_string() },
        ]);

        let d = desired("MX", "mx").with_priority(30);
        assert_eq!(remove(&mut values, &d, "mx", EXACT).unwrap(), Removal::NotFound);

        let d = desired("MX", "mx").with_priority(20);
        assert_eq!(remove(&mut values, &d, "mx", EXACT).unwrap(), Removal::Removed);
        assert_eq!(values.flatten(), vec!["10 mx"]);
    }

    #[test]
    fn test_remove_txt_within_bucket() {
        let mut values = txt(&[&["a", "b"]]);
        let d = desired("TXT", "a");
        assert_eq!(remove(&mut values, &d, "a", EXACT).unwrap(), Removal::Removed);
        assert_eq!(values, txt(&[&["b"]]));
    }

    #[test]
    fn test_remove_txt_prunes_empty_bucket() {
        let mut values = txt(&[&["a"], &["b"]]);
        let d = desired("TXT", "a");
        assert_eq!(remove(&mut values, &d, "a", EXACT).unwrap(), Removal::Removed);
        assert_eq!(values, txt(&[&["b"]]));
    }

    #[test]
    fn test_remove_txt_every_occurrence() {
        let mut values = txt(&[&["a", "x"], &["a"], &["y", "a"]]);
        let d = desired("TXT", "a");
        assert_eq!(remove(&mut values, &d, "a", EXACT).unwrap(), Removal::Removed);
        assert_eq!(values, txt(&[&["x"], &["y"]]));
    }

    #[test]
    fn test_remove_last_txt_value_deletes_whole_set() {
        let mut values = txt(&[&["a"]]);
        let d = desired("TXT", "a");
        assert_eq!(remove(&mut values, &d, "a", EXACT).unwrap(), Removal::WholeSet);
    }

    #[test]
    fn test_remove_missing_txt_value() {
        let mut values = txt(&[&["a"], &["b"]]);
        let d = desired("TXT", "zzz");
        assert_eq!(remove(&mut values, &d, "zzz", EXACT).unwrap(), Removal::NotFound);
        assert_eq!(values, txt(&[&["a"], &["b"]]));
    }
}
