// Header resolution for loosely-named CSV exports.
//
// Each semantic field has one rule: an optional exact header name, then an
// ordered list of clauses, where a clause is a set of alternative
// substrings. An exact (trimmed, case-insensitive) match always wins.
// Otherwise a header matches when, for every clause, its lowercased text
// contains at least one alternative, and the first such header in file
// order wins.
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    MorningDip,
    EveningDip,
    DieselUsed,
    Balance,
    Attendant,
    Security,
    Equipment,
    Fleet,
    FuelIssued,
    Activity,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::MorningDip => "morning dip reading",
            Field::EveningDip => "evening dip reading",
            Field::DieselUsed => "diesel issued/used",
            Field::Balance => "balance",
            Field::Attendant => "fuel attendant",
            Field::Security => "security personnel",
            Field::Equipment => "equipment name",
            Field::Fleet => "fleet no",
            Field::FuelIssued => "fuel issued",
            Field::Activity => "comment/remarks",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub type Clause = &'static [&'static str];

pub struct ColumnRule {
    pub field: Field,
    pub exact: Option<&'static str>,
    pub clauses: &'static [Clause],
}

pub const DIPPING_RULES: &[ColumnRule] = &[
    ColumnRule { field: Field::Date, exact: Some("date"), clauses: &[&["date"]] },
    ColumnRule { field: Field::MorningDip, exact: None, clauses: &[&["morning"], &["reading"]] },
    ColumnRule { field: Field::EveningDip, exact: None, clauses: &[&["evening"], &["reading"]] },
    ColumnRule { field: Field::DieselUsed, exact: None, clauses: &[&["diesel"], &["issued", "used"]] },
    ColumnRule { field: Field::Balance, exact: None, clauses: &[&["balance"]] },
    ColumnRule { field: Field::Attendant, exact: None, clauses: &[&["attendant"]] },
    ColumnRule { field: Field::Security, exact: None, clauses: &[&["security"]] },
];

pub const EQUIPMENT_RULES: &[ColumnRule] = &[
    ColumnRule { field: Field::Date, exact: Some("date"), clauses: &[&["date"]] },
    ColumnRule { field: Field::Equipment, exact: None, clauses: &[&["equipment"]] },
    ColumnRule { field: Field::Fleet, exact: None, clauses: &[&["fleet"]] },
    ColumnRule {
        field: Field::FuelIssued,
        exact: None,
        clauses: &[&["fuel"], &["issued", "(lts)", "litre", "liter"]],
    },
    ColumnRule { field: Field::Activity, exact: None, clauses: &[&["comment", "remark"]] },
];

fn header_matches(header: &str, clauses: &[Clause]) -> bool {
    let lowered = header.trim().to_lowercase();
    !clauses.is_empty()
        && clauses
            .iter()
            .all(|alts| alts.iter().any(|needle| lowered.contains(needle)))
}

/// Index of the first header satisfying every clause, or `None`.
pub fn resolve<S: AsRef<str>>(headers: &[S], clauses: &[Clause]) -> Option<usize> {
    headers
        .iter()
        .position(|h| header_matches(h.as_ref(), clauses))
}

/// Exact header first, then the substring clauses.
pub fn resolve_rule<S: AsRef<str>>(headers: &[S], rule: &ColumnRule) -> Option<usize> {
    rule.exact
        .and_then(|name| {
            headers
                .iter()
                .position(|h| h.as_ref().trim().eq_ignore_ascii_case(name))
        })
        .or_else(|| resolve(headers, rule.clauses))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub header: String,
}

/// Field-to-column assignments for one dataset load.
#[derive(Debug, Clone, Default)]
pub struct ResolvedColumnMap {
    columns: HashMap<Field, ResolvedColumn>,
    unresolved: Vec<Field>,
}

impl ResolvedColumnMap {
    pub fn build<S: AsRef<str>>(headers: &[S], rules: &[ColumnRule]) -> Self {
        let mut map = ResolvedColumnMap::default();
        for rule in rules {
            match resolve_rule(headers, rule) {
                Some(index) => {
                    let header = headers[index].as_ref().trim().to_string();
                    log::debug!("Resolved {} -> '{}' (column {})", rule.field, header, index);
                    map.columns.insert(rule.field, ResolvedColumn { index, header });
                }
                None => map.unresolved.push(rule.field),
            }
        }
        map
    }

    pub fn get(&self, field: Field) -> Option<&ResolvedColumn> {
        self.columns.get(&field)
    }

    pub fn index(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).map(|c| c.index)
    }

    pub fn is_resolved(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// Unresolved fields in rule order.
    pub fn unresolved(&self) -> &[Field] {
        &self.unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIPPING_HEADERS: &[&str] = &[
        "Date",
        "Morning Dip Time",
        "Morning Dip Reading (Liters)",
        "Fuel Attendant Name",
        "Security Personnel Name",
        "Evening Dip Time",
        "Evening Dip Reading (Liters)",
        "Diesel Issued/Used (Liters)",
        "Fuel Attendant Personnel",
        "Security Personnel",
        "Balance (Liters)",
    ];

    #[test]
    fn resolves_reference_dipping_headers() {
        let map = ResolvedColumnMap::build(DIPPING_HEADERS, DIPPING_RULES);
        assert_eq!(map.index(Field::Date), Some(0));
        assert_eq!(map.index(Field::MorningDip), Some(2));
        assert_eq!(map.index(Field::EveningDip), Some(6));
        assert_eq!(map.index(Field::DieselUsed), Some(7));
        assert_eq!(map.index(Field::Balance), Some(10));
        // first of the two attendant columns wins
        assert_eq!(map.index(Field::Attendant), Some(3));
        assert_eq!(map.index(Field::Security), Some(4));
        assert!(map.unresolved().is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_and_trims() {
        let headers = ["  DIESEL USED ", "diesel"];
        assert_eq!(resolve(&headers, &[&["diesel"], &["issued", "used"]]), Some(0));
    }

    #[test]
    fn all_clauses_must_match() {
        let headers = ["Diesel Price", "Diesel Issued"];
        assert_eq!(resolve(&headers, &[&["diesel"], &["issued", "used"]]), Some(1));
    }

    #[test]
    fn unresolved_is_none_not_a_panic() {
        let headers = ["Date", "Balance"];
        assert_eq!(resolve(&headers, &[&["diesel"]]), None);
        let map = ResolvedColumnMap::build(&headers, DIPPING_RULES);
        assert!(map.unresolved().contains(&Field::DieselUsed));
        assert!(!map.is_resolved(Field::MorningDip));
    }

    #[test]
    fn resolution_is_deterministic() {
        let headers = ["Fuel Issued  (LTS)", "Fuel Efficiency - (Km/Ltrs)", "Fuel consumed"];
        let first = resolve(&headers, EQUIPMENT_RULES[3].clauses);
        let second = resolve(&headers, EQUIPMENT_RULES[3].clauses);
        assert_eq!(first, Some(0));
        assert_eq!(first, second);
    }

    #[test]
    fn activity_accepts_comment_or_remark() {
        let headers = ["Date", "Operator Remarks"];
        let map = ResolvedColumnMap::build(&headers, EQUIPMENT_RULES);
        assert_eq!(map.get(Field::Activity).map(|c| c.header.as_str()), Some("Operator Remarks"));
    }

    #[test]
    fn exact_date_header_beats_earlier_substring_match() {
        let headers = ["Last Updated By", "Date", "Diesel Issued/Used (Liters)"];
        let map = ResolvedColumnMap::build(&headers, DIPPING_RULES);
        assert_eq!(map.get(Field::Date).map(|c| c.header.as_str()), Some("Date"));
    }

    #[test]
    fn date_falls_back_to_substring_without_exact_header() {
        let headers = ["Dip Date", "Balance"];
        assert_eq!(resolve_rule(&headers, &DIPPING_RULES[0]), Some(0));
    }

    #[test]
    fn empty_intent_never_matches() {
        let headers = ["Date"];
        assert_eq!(resolve(&headers, &[]), None);
    }
}
